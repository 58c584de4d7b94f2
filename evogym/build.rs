fn main() {
    println!("cargo::rustc-check-cfg=cfg(pretty_logs)");
    println!("cargo::rerun-if-env-changed=EVOGYM_LOG_PRETTY");
    if matches!(std::env::var("EVOGYM_LOG_PRETTY").as_deref(), Ok("1" | "true")) {
        println!("cargo::rustc-cfg=pretty_logs");
    }
}
