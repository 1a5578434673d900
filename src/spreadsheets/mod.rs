pub mod export_xlsx;
pub mod headers;
pub mod input_sheet;
pub mod template;

pub use export_xlsx::{build_report, default_report_path, export_report_xlsx};
pub use headers::Field;
pub use input_sheet::InputSheet;
pub use template::dump_template;
