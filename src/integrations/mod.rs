//! External service integrations.

pub mod people_client {
    pub use crate::people_client::*;
}

pub mod diagnostics {
    pub use crate::diagnostics::*;
}
