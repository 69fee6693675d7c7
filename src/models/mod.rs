mod output;

pub use output::{ExtraData, Header, LEADGATE_OUTPUT_FORMAT_VERSION, LeadReport, Output, Summary};
