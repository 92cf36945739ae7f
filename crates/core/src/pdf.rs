//! PDF tool operations.
//!
//! The API recognises the operation names so that clients get a precise
//! answer, but no PDF processing backend is wired in.

use crate::define_str_enum;

define_str_enum! {
    /// Operations offered by the PDF tools page.
    PdfOperation("PDF operation") {
        Split = "split",
        Compress = "compress",
        Rotate = "rotate",
        Protect = "protect",
        Organize = "organize",
        Merge = "merge",
    }
}

/// Message returned for a recognised operation.
pub fn unavailable_message(op: PdfOperation) -> String {
    format!("PDF operation '{op}' is not available: no PDF processing backend is configured")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_six_operations_are_recognised() {
        for name in ["split", "compress", "rotate", "protect", "organize", "merge"] {
            assert!(PdfOperation::from_str_value(name).is_ok(), "{name}");
        }
        assert!(PdfOperation::from_str_value("ocr").is_err());
    }

    #[test]
    fn message_names_the_operation() {
        assert!(unavailable_message(PdfOperation::Rotate).contains("'rotate'"));
    }
}
