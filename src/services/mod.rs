pub(crate) mod adaptive;
pub(crate) mod exam_summary;
pub(crate) mod scoring;
