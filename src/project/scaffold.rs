// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Creates a new generator project directory.
//!
//! A new project holds a Makefile with an empty configuration block, one
//! generator source named after the project and a `.gitignore`. File names
//! and contents are templates in which `{name}` and `{halide_dir}` are
//! replaced.

use super::editor::make_key;
use crate::config::consts::{DEFAULT_HALIDE_DIR, HALIDE_DIR_ENV_VAR};
use crate::errors::ProjectError;
use crate::observability::messages::project::ProjectCreated;
use crate::observability::messages::StructuredLog;
use std::fs;
use std::path::{Path, PathBuf};

const MAKEFILE_TEMPLATE: &str = "\
# {name}: Halide generators built with hlgen
HALIDE_DISTRIB_PATH ?= {halide_dir}
HL_TARGET ?= host
BIN ?= bin

CXX ?= c++
CXXFLAGS += -std=c++17 -I$(HALIDE_DISTRIB_PATH)/include
LDFLAGS += -L$(HALIDE_DISTRIB_PATH)/lib -lHalide -ldl -lpthread

GENERATORS = $(patsubst %.gen.cpp,%,$(wildcard *.gen.cpp))

# Configure generators
# CFG__<generator>[__<configuration>] = [target=<target>] <generator params>
CFG__{name} =

all: $(GENERATORS:%=$(BIN)/%.generator)

$(BIN)/%.generator: %.gen.cpp $(HALIDE_DISTRIB_PATH)/share/Halide/tools/GenGen.cpp
\t@mkdir -p $(@D)
\t$(CXX) $(CXXFLAGS) $^ -o $@ $(LDFLAGS)

clean:
\trm -rf $(BIN)

.PHONY: all clean
";

const GENERATOR_TEMPLATE: &str = "\
#include \"Halide.h\"

using namespace Halide;

class {name}_generator : public Generator<{name}_generator> {
public:
    Input<Buffer<uint8_t, 2>> input{\"input\"};
    Output<Buffer<uint8_t, 2>> output{\"output\"};

    void generate() {
        Var x(\"x\"), y(\"y\");
        output(x, y) = input(x, y);
    }
};

HALIDE_REGISTER_GENERATOR({name}_generator, {name})
";

const GITIGNORE_TEMPLATE: &str = "bin/\n";

/// `(file name, contents)` templates of a new project.
const PROJECT_FILES: [(&str, &str); 3] = [
    ("Makefile", MAKEFILE_TEMPLATE),
    ("{name}.gen.cpp", GENERATOR_TEMPLATE),
    (".gitignore", GITIGNORE_TEMPLATE),
];

/// The Halide distribution for new projects: `value` (normally the
/// `HALIDE_DISTRIB_PATH` environment variable) when set, else `/opt/halide`.
pub fn halide_directory_from(value: Option<String>) -> String {
    value
        .map(|dir| dir.trim().to_string())
        .filter(|dir| !dir.is_empty())
        .unwrap_or_else(|| DEFAULT_HALIDE_DIR.to_string())
}

/// The Halide distribution named by `HALIDE_DISTRIB_PATH`, or the default.
pub fn halide_directory() -> String {
    halide_directory_from(std::env::var(HALIDE_DIR_ENV_VAR).ok())
}

fn expand(template: &str, name: &str, halide_dir: &str) -> String {
    template
        .replace("{name}", name)
        .replace("{halide_dir}", halide_dir)
}

/// Create project `name` as a new directory under `parent`.
///
/// The name doubles as the first generator's name, so it must be a valid
/// generator segment.
///
/// # Errors
/// * `Enumeration(MalformedKey)` if `name` is not a valid generator name
/// * `ProjectExists` if the directory is already there
/// * `Write` if a directory or file cannot be written
pub fn create_project<P: AsRef<Path>>(
    parent: P,
    name: &str,
    halide_dir: &str,
) -> Result<PathBuf, ProjectError> {
    make_key(name, None)?;

    let dir = parent.as_ref().join(name);
    if dir.exists() {
        return Err(ProjectError::ProjectExists { path: dir });
    }
    fs::create_dir_all(&dir).map_err(|source| ProjectError::Write {
        path: dir.clone(),
        source,
    })?;

    for (file_name, contents) in PROJECT_FILES {
        let path = dir.join(expand(file_name, name, halide_dir));
        fs::write(&path, expand(contents, name, halide_dir))
            .map_err(|source| ProjectError::Write { path, source })?;
    }

    ProjectCreated {
        name,
        path: &dir.display().to_string(),
        file_count: PROJECT_FILES.len(),
    }
    .log();
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerator::{enumerate_configurations, EnumerateOptions};
    use crate::errors::EnumerationError;
    use crate::sources::{discover_generators, MakefileSource};

    #[test]
    fn test_new_project_enumerates_its_generator() {
        let parent = tempfile::tempdir().unwrap();
        let dir = create_project(parent.path(), "blur", "/opt/halide-17").unwrap();
        assert_eq!(dir, parent.path().join("blur"));

        let makefile = MakefileSource::load(dir.join("Makefile")).unwrap();
        assert!(makefile.block().marker.is_some());
        assert!(makefile
            .lines()
            .iter()
            .any(|line| line == "HALIDE_DISTRIB_PATH ?= /opt/halide-17"));

        assert_eq!(discover_generators(&dir).unwrap(), vec!["blur"]);
        let source = fs::read_to_string(dir.join("blur.gen.cpp")).unwrap();
        assert!(source.contains("HALIDE_REGISTER_GENERATOR(blur_generator, blur)"));
        assert!(source.contains("Input<Buffer<uint8_t, 2>> input{\"input\"};"));

        let options = EnumerateOptions::new().with_default_target("host");
        let enumeration = enumerate_configurations(makefile.bindings(), &options).unwrap();
        let artifacts: Vec<&str> = enumeration.configurations().map(|c| c.artifact.as_str()).collect();
        assert_eq!(artifacts, vec!["blur"]);
    }

    #[test]
    fn test_recipe_lines_use_tabs() {
        let parent = tempfile::tempdir().unwrap();
        let dir = create_project(parent.path(), "warp", DEFAULT_HALIDE_DIR).unwrap();
        let makefile = fs::read_to_string(dir.join("Makefile")).unwrap();
        assert!(makefile.contains("\n\trm -rf $(BIN)\n"));
        assert_eq!(fs::read_to_string(dir.join(".gitignore")).unwrap(), "bin/\n");
    }

    #[test]
    fn test_existing_directory_is_refused() {
        let parent = tempfile::tempdir().unwrap();
        fs::create_dir(parent.path().join("blur")).unwrap();
        let err = create_project(parent.path(), "blur", DEFAULT_HALIDE_DIR).unwrap_err();
        assert!(matches!(err, ProjectError::ProjectExists { .. }));
    }

    #[test]
    fn test_invalid_name_creates_nothing() {
        let parent = tempfile::tempdir().unwrap();
        let err = create_project(parent.path(), "my-project", DEFAULT_HALIDE_DIR).unwrap_err();
        assert!(matches!(
            err,
            ProjectError::Enumeration(EnumerationError::MalformedKey { .. })
        ));
        assert_eq!(fs::read_dir(parent.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_halide_directory_fallback() {
        assert_eq!(halide_directory_from(None), "/opt/halide");
        assert_eq!(halide_directory_from(Some("  ".to_string())), "/opt/halide");
        assert_eq!(
            halide_directory_from(Some("/usr/local/halide".to_string())),
            "/usr/local/halide"
        );
    }
}
