/// Marker every configuration key starts with
pub const KEY_MARKER: &str = "CFG";
/// Field delimiter inside configuration keys
pub const KEY_DELIMITER: &str = "__";
/// Prefix used to pick configuration keys out of a larger namespace
pub const KEY_PREFIX: &str = "CFG__";
/// Leading value token that selects an explicit build target
pub const TARGET_TOKEN: &str = "target=";
/// File name suffix of generator sources in a project directory
pub const GENERATOR_FILE_SUFFIX: &str = ".gen.cpp";
/// Comment that opens the configuration block of a project Makefile
pub const CONFIG_BLOCK_MARKER: &str = "# Configure generators";
/// Environment variable that overrides the default build target
pub const TARGET_ENV_VAR: &str = "HL_TARGET";
/// Settings files looked up in the project directory, in order
pub const SETTINGS_FILE_NAMES: [&str; 3] = ["hlgen.yaml", "hlgen.yml", "hlgen.toml"];
/// Makefile read when settings don't name one
pub const DEFAULT_MAKEFILE: &str = "Makefile";
/// Build command used when settings don't name one
pub const DEFAULT_BUILD_COMMAND: &str =
    "make {artifact} HL_TARGET={target} GENERATOR_ARGS={params}";
/// Environment variable naming the Halide distribution used by new projects
pub const HALIDE_DIR_ENV_VAR: &str = "HALIDE_DISTRIB_PATH";
/// Halide distribution used by new projects when the environment names none
pub const DEFAULT_HALIDE_DIR: &str = "/opt/halide";
