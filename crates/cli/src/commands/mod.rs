mod check;
mod generate;
mod parse;

pub(crate) use check::cmd_check;
pub(crate) use generate::cmd_generate;
pub(crate) use parse::cmd_parse;

use std::path::{Path, PathBuf};
use std::process;

use idlc_core::{FileSystemProvider, ParsedFile};

use crate::{report_parse_error, OutputFormat};

/// Parse `file` and its includes, or print the error and exit 1.
pub(crate) fn load_or_exit(
    file: &Path,
    include_dirs: Vec<PathBuf>,
    output: OutputFormat,
    quiet: bool,
) -> ParsedFile {
    let provider = FileSystemProvider::with_include_dirs(include_dirs);
    match idlc_core::parse_file_with_provider(file, &provider) {
        Ok(parsed) => parsed,
        Err(e) => {
            report_parse_error(&e, output, quiet);
            process::exit(1);
        }
    }
}
