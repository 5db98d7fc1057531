fn main() -> anyhow::Result<()> {
    xlsxmap_codegen::cli::run()
}
