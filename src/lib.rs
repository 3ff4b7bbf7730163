//! Recovers client contact records (name, email, phone, gender) from pasted
//! or extracted free text with no fixed columns.
//!
//! ```
//! let clients = client_extract::extract_clients(
//!     "João Pedro joao@teste.com (21) 3333-4444 Ana Costa ana@teste.com (21) 99999-0000",
//! );
//! assert_eq!(clients.len(), 2);
//! assert_eq!(clients[1].name, "Ana Costa");
//! assert_eq!(clients[1].phone, "21999990000");
//! ```

pub mod config;
pub mod lexicon;
pub mod parser;

pub use config::{ConfigError, Settings};
pub use lexicon::Lexicon;
pub use parser::extract::gender::Gender;
pub use parser::extract::{ExtractedClientRecord, RejectReason};
pub use parser::{extract_clients, ExtractionReport, Extractor, Rejection};
