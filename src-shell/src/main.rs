fn main() -> anyhow::Result<()> {
    tabnest_shell::run()
}
