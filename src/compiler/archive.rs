// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Archive packaging of compiled modules.
//!
//! The output container is a plain ZIP archive carrying one deflated entry
//! per compilation unit. The bytecode inside each entry has no header of its
//! own; decoders dispatch on the first opcode byte.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::compiler::{CompilationUnit, RunError};

/// Write all compiled units to a `.xex` archive at `path`.
pub fn write_archive(path: &Path, units: &[CompilationUnit]) -> Result<(), RunError> {
    let file = File::create(path).map_err(|source| RunError::CreateArchive {
        path: path.to_string_lossy().to_string(),
        source,
    })?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for unit in units {
        writer
            .start_file(unit.module_name.as_str(), options)
            .map_err(|source| RunError::AddModule {
                name: unit.module_name.clone(),
                source,
            })?;
        writer
            .write_all(&unit.bytecode)
            .map_err(|source| RunError::AddModule {
                name: unit.module_name.clone(),
                source: source.into(),
            })?;
    }

    writer.finish().map_err(RunError::FinalizeArchive)?;
    Ok(())
}
