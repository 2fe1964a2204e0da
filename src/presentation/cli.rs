// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// 静态流程交互输入时的提示语
pub const INPUT_PROMPT: &str = "Enter the path to your text file with URLs: ";

#[derive(Parser, Debug)]
#[command(name = "domain-scraper")]
#[command(about = "Scrape expiring domain listings into per-site CSV files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch static HTML pages and extract table or block rows
    Static {
        /// Text file with one URL per line (prompted for when omitted)
        #[arg(short, long, value_name = "PATH")]
        input: Option<PathBuf>,

        /// Directory for the per-site CSV files
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },
    /// Render pages in a headless browser and follow pagination links
    Dynamic {
        /// Text file with one URL per line (defaults to input.dynamic_file)
        #[arg(short, long, value_name = "PATH")]
        input: Option<PathBuf>,

        /// Directory for the per-site CSV files
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },
}

/// 在 `output` 上显示提示，从 `input` 读取一行路径
pub fn prompt_for_path<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<PathBuf> {
    write!(output, "{}", INPUT_PROMPT)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(PathBuf::from(line.trim()))
}
