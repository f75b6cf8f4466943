//! CLI parse tests.

use super::{Cli, CliCommand, CrawlArgs};
use clap::Parser;

pub(super) fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

pub(super) fn parse_crawl(args: &[&str]) -> CrawlArgs {
    match parse(args) {
        CliCommand::Crawl(args) => args,
        other => panic!("expected Crawl, got {other:?}"),
    }
}
