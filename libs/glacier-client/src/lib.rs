//! Amazon Glacier vault client.
//!
//! Signed create, delete, describe and list operations on vaults. Requests
//! are signed with AWS Signature Version 4 and sent one at a time; JSON
//! responses are passed through as generic documents.
//!
//! ```no_run
//! # async fn run() -> glacier_client::GlacierResult<()> {
//! use glacier_client::{DEFAULT_LIST_LIMIT, GlacierClient, ListVaultsPage};
//!
//! let client = GlacierClient::new("us-east-1", "AKIDEXAMPLE", "secret")?;
//! if client.create_vault("photos").await {
//!     let page = client.try_list_vaults(DEFAULT_LIST_LIMIT, None).await?;
//!     println!("{:?}", page.vault_names());
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod signer;
pub mod transport;

pub use client::{DEFAULT_LIST_LIMIT, GlacierClient};
pub use clock::{Clock, SystemClock};
pub use config::{Credentials, GlacierConfig};
pub use error::{GlacierError, GlacierResult};
pub use request::{GlacierRequest, HttpMethod, RequestBuilder};
pub use response::{Document, ListVaultsPage};
pub use signer::{SigV4Signer, Signer, SigningScope};
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportConfig};
