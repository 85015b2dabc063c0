use ftpbench::error::AppResult;

fn main() -> AppResult<()> {
    ftpbench::entry::run()
}
