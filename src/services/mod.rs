//! Capabilities the label workflow is injected with, and the
//! implementations the command-line tool uses.

mod error;
mod http;
mod notifier;
mod printer;
mod traits;

pub use error::ServiceError;
pub use http::{build_client, HttpNormalizer, HttpPersistence, NONCE_HEADER};
pub use notifier::TracingNotifier;
pub use printer::{pdf_data_uri, PdfFilePrinter, PDF_DATA_URI_PREFIX};
pub use traits::{
    AddressNormalizer, DocumentPrinter, LabelPersistence, NormalizeRequest, Notifier,
    SaveRequest,
};
