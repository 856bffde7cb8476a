//! Fixture file loading.

use crate::{parse_fixture, ContractFixture, SpecError};
use std::fs;
use std::path::Path;

/// Load a single fixture file.
pub fn load_fixture(path: &Path) -> Result<ContractFixture, SpecError> {
    let content = fs::read_to_string(path).map_err(|e| SpecError::Load {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_fixture(&content)
}

/// Load all fixtures from a directory (glob: **/*.contract), sorted by name.
pub fn load_all_fixtures(dir: &Path) -> Result<Vec<(String, ContractFixture)>, SpecError> {
    let mut fixtures = Vec::new();
    load_fixtures_recursive(dir, dir, &mut fixtures)?;
    fixtures.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(fixtures)
}

fn load_fixtures_recursive(
    base: &Path,
    dir: &Path,
    fixtures: &mut Vec<(String, ContractFixture)>,
) -> Result<(), SpecError> {
    if !dir.is_dir() {
        return Ok(());
    }

    let load_error = |e: std::io::Error| SpecError::Load {
        path: dir.display().to_string(),
        message: e.to_string(),
    };

    for entry in fs::read_dir(dir).map_err(load_error)? {
        let path = entry.map_err(load_error)?.path();

        if path.is_dir() {
            load_fixtures_recursive(base, &path, fixtures)?;
        } else if path.extension().map_or(false, |e| e == "contract") {
            let relative = path.strip_prefix(base).unwrap_or(&path);
            let fixture = load_fixture(&path)?;
            fixtures.push((relative.display().to_string(), fixture));
        }
    }

    Ok(())
}
