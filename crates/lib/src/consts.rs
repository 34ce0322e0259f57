//! Fixed names of the application layout.

pub const APP_NAME: &str = "kbuild";

/// Source directory, walked for `.c` and `.cpp` files.
pub const SRC_DIR: &str = "src";
/// Static assets embedded into the shared library.
pub const ASSETS_DIR: &str = "assets";
pub const CONF_DIR: &str = "conf";
/// Object cache, also holds the generated asset sources.
pub const OBJ_DIR: &str = ".objs";
pub const CERT_DIR: &str = "cert";

/// Transient header declaring every embedded asset, lives under `src/`.
pub const ASSETS_HEADER: &str = "assets.h";
pub const ASSETS_HEADER_GUARD: &str = "__H_KORE_ASSETS_H";

pub const CONF_EXT: &str = "conf";
pub const LIB_EXT: &str = "so";
pub const OBJ_EXT: &str = "o";

/// Executable of the server runtime that loads the built library.
pub const SERVER_BIN: &str = "kore";
