fn main() -> anyhow::Result<()> {
    uri_params::cli::run()
}
