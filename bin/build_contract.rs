//! Binary for building WASM contracts from odra modules.
#![doc = "Binary for building WASM contracts from odra modules."]

#[allow(unused_imports)]
use emission_farm;

fn main() {
    // Compilation of RewardPool and FarmToken to WASM is driven by odra-build
}
