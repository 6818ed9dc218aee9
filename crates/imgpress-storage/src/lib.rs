//! imgpress Storage Library
//!
//! Filesystem helpers for the two directories the gateway owns:
//!
//! - the **upload holding area**, where each request's file lives only for the
//!   duration of that request (see [`TempUpload`]);
//! - the **compressed-output area**, where finished files are kept and served.
//!
//! Filenames are generated centrally in the `keys` module. No locking is used:
//! every request works on its own uniquely named file.

pub mod error;
pub(crate) mod keys;
pub mod output;
pub mod upload;

pub use error::{StorageError, StorageResult};
pub use output::{CompressedArea, StoredOutput};
pub use upload::{TempUpload, UploadArea, UploadWriter};
