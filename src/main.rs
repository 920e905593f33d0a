fn main() -> anyhow::Result<()> {
    ldp_server::cli::run_cli()
}
