//! # Voxel Planet Demo
//!
//! Generates a planet, sculpts it and logs the results. Pass a JSON config
//! file as the first argument to override the defaults.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- planet.json
//! ```

use log::error;

fn main() {
    if let Err(e) = voxel_planet::run() {
        error!("{}", e);
        std::process::exit(1);
    }
}
