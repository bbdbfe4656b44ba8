//! CLI entry point for termino.

mod app;
mod cli;
#[cfg(test)]
#[allow(dead_code)]
mod testsupport;

use clap::Parser;

#[tokio::main]
async fn main() {
    let args = match cli::Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // `--help`/`--version` also arrive here and are not failures.
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    let ok = app::entry::run(args).await;
    std::process::exit(if ok { 0 } else { 1 });
}
