fn main() -> anyhow::Result<()> {
    // Keep the status line clean unless RUST_LOG asks for more.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    monofm::runtime::run()
}
