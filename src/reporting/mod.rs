mod sink;

pub use sink::{ChannelSink, ReportSink, StdoutSink, format_report_line};
