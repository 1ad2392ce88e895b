fn main() -> anyhow::Result<()> {
    ea_builder_lib::run()
}
