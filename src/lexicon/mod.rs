//! Provider-facing layer: wire clients and payload transformers.
//!
//! Each supported provider contributes one [`LexicalClient`] speaking its
//! HTTP protocol and one [`ResponseTransformer`] mapping its payload to
//! the canonical [`WordInfo`].

pub mod connectivity;
pub mod free_dictionary;
pub mod frequency;
pub mod http;
pub mod lexicala;
pub mod provider;
pub mod types;

pub use connectivity::{ConnectivityHandle, ConnectivityMonitor};
pub use free_dictionary::{FreeDictionaryClient, FreeDictionaryTransformer};
pub use lexicala::{LexicalaClient, LexicalaTransformer};
pub use provider::{LexicalClient, ProviderFactory, ProviderPair, ResponseTransformer};
pub use types::*;
