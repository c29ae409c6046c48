fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    granular_impact::start();
}
