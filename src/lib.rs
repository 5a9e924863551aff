//! TrueNAS Dataset Manager
//!
//! Create, list, remove and wipe ZFS datasets on a TrueNAS system and export
//! them over NFS, using the TrueNAS REST API (`/api/v2.0`).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │   tnmanage   │   HTTPS + JSON     │   TrueNAS    │
//! │              │ ◄────────────────► │  /api/v2.0   │
//! │  ┌────────┐  │   Bearer API key   └──────────────┘
//! │  │Commands│  │
//! │  └───┬────┘  │      ┌─────────────┐
//! │  ┌───▼────┐  │ ◄─── │ ~/.tnmanage │
//! │  │ Client │  │      └─────────────┘
//! │  └────────┘  │
//! └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`truenas`] - REST client and API type definitions
//! - [`commands`] - `add`, `list`, `remove`, `clear` and `config` subcommands
//! - [`cli`] - Command line definitions
//! - [`config`] - Settings file and connection settings resolution
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use tnmanage::config::{ConfigFile, Settings};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load(&ConfigFile::default_location()?);
//!     let client = settings
//!         .resolve(None, None)
//!         .and_then(tnmanage::truenas::TrueNasClient::new)?;
//!     for dataset in client.list_datasets("tank").await? {
//!         println!("{}", dataset.id);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod truenas;
