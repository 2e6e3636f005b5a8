//! Reading scripts from disk

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::graph::CurriculumGraph;
use crate::limits::validate_script_size;
use crate::model::ParsedModel;
use crate::parser::parse;

/// Read a script file as UTF-8 text
///
/// Files over [`MAX_SCRIPT_BYTES`](crate::limits::MAX_SCRIPT_BYTES) are
/// rejected before they are read.
pub fn load_script(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(io_err)?;
    validate_script_size(metadata.len())?;

    let bytes = fs::read(path).map_err(io_err)?;
    let text = String::from_utf8(bytes).map_err(|_| Error::InvalidEncoding {
        path: path.to_path_buf(),
    })?;

    tracing::debug!("Read {} bytes from {}", text.len(), path.display());
    Ok(text)
}

/// Read, parse and build in one step
pub fn load_and_build(path: impl AsRef<Path>) -> Result<(ParsedModel, CurriculumGraph)> {
    let script = load_script(path)?;
    let model = parse(&script);
    let graph = CurriculumGraph::from_model(&model);
    Ok((model, graph))
}
