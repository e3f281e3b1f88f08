//! Acquiring class bytes and registering them in the method area (§4.2).
//!
//! `load_class_from_file` and `load_class_from_jar` both bottom out in
//! `define_class`: parse, build a `ClassEntry`, insert it. The archive
//! layer (the `zip` crate — an enrichment over the teacher, which has no
//! jar support of its own) is only asked to yield per-member byte buffers;
//! this module doesn't know or care how deflate works.

use std::error::Error;
use std::fs;
use std::io::Read as _;
use std::path::Path;

use log::{debug, warn};

use classfile::class_file::ClassFile;

use crate::class_entry::ClassEntry;
use crate::method_area::MethodArea;

/// Parses `bytes` and registers the resulting class in `area`. `expected_name`,
/// when given, is cross-checked against the `this_class` constant.
pub fn define_class(
    area: &MethodArea,
    expected_name: Option<&str>,
    bytes: &[u8],
) -> Result<usize, Box<dyn Error>> {
    let class_file = ClassFile::from_bytes(bytes, expected_name)?;
    let entry = ClassEntry::from_class_file(&class_file)?;
    debug!("defined class {}", entry.name);
    Ok(area.define(entry))
}

/// Reads `path` into memory and defines the class under `name`. If the
/// method area already has an entry for `name` (state `Loading` or later),
/// that entry is returned instead of re-parsing — the cycle-safety the
/// super-chain walk in the linker depends on.
pub fn load_class_from_file(
    area: &MethodArea,
    path: &Path,
    name: &str,
) -> Result<usize, Box<dyn Error>> {
    if let Some(existing) = area.index_of(name) {
        debug!("class {name} already present in the method area, skipping reload");
        return Ok(existing);
    }
    let bytes = fs::read(path)?;
    define_class(area, Some(name), &bytes)
}

/// Enumerates every `.class` member of the jar at `path`, parsing and
/// registering each. A member that fails to parse is logged and skipped
/// rather than aborting the whole archive.
pub fn load_class_from_jar(area: &MethodArea, path: &Path) -> Result<Vec<usize>, Box<dyn Error>> {
    let file = fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    let mut indices = Vec::new();
    for i in 0..archive.len() {
        let mut member = archive.by_index(i)?;
        if !member.name().ends_with(".class") {
            continue;
        }
        let member_name = member.name().to_string();
        let mut bytes = Vec::new();
        member.read_to_end(&mut bytes)?;
        match define_class(area, None, &bytes) {
            Ok(idx) => indices.push(idx),
            Err(e) => warn!("failed to load {member_name} from {}: {e}", path.display()),
        }
    }
    Ok(indices)
}
