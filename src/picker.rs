//! Minimal interactive prompts used at startup, before any streaming begins.

use crossterm::style::Stylize;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::error::{Error, Result};

/// Parse a selection like `1,3 4` or `all` against `count` numbered options
/// (1-based). Empty input selects nothing. `None` means the input is invalid.
pub fn parse_selection(input: &str, count: usize) -> Option<Vec<usize>> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("all") {
        return Some((0..count).collect());
    }

    let mut picked = Vec::new();
    for token in input.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        let n: usize = token.parse().ok()?;
        if n == 0 || n > count {
            return None;
        }
        if !picked.contains(&(n - 1)) {
            picked.push(n - 1);
        }
    }
    Some(picked)
}

fn print_options(title: &str, options: &[String]) {
    println!("{}", title.bold());
    for (i, option) in options.iter().enumerate() {
        println!("  {:>3}) {}", (i + 1).to_string().cyan(), option);
    }
}

fn print_prompt(text: &str) {
    print!("{}", text);
    let _ = std::io::Write::flush(&mut std::io::stdout());
}

/// One line of input. A closed input is an error, not an empty answer.
async fn read_line<R: AsyncBufRead + Unpin>(input: &mut R) -> Result<String> {
    let mut line = String::new();
    let n = input.read_line(&mut line).await.map_err(Error::Prompt)?;
    if n == 0 {
        return Err(Error::Prompt(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed before a selection was made",
        )));
    }
    Ok(line)
}

/// Ask for exactly one option on stdin.
pub async fn select_one(title: &str, options: &[String]) -> Result<String> {
    let mut input = BufReader::new(tokio::io::stdin());
    select_one_from(&mut input, title, options).await
}

pub async fn select_one_from<R: AsyncBufRead + Unpin>(
    input: &mut R,
    title: &str,
    options: &[String],
) -> Result<String> {
    if options.is_empty() {
        return Err(Error::EmptyChoice(title.to_string()));
    }
    print_options(title, options);

    loop {
        print_prompt("Enter a number: ");
        let line = read_line(input).await?;
        match parse_selection(&line, options.len()).as_deref() {
            Some([idx]) => return Ok(options[*idx].clone()),
            _ => println!("{}", "Please enter a single number from the list".yellow()),
        }
    }
}

/// Ask for any number of options on stdin. An empty answer selects nothing.
pub async fn select_many(title: &str, options: &[String]) -> Result<Vec<String>> {
    let mut input = BufReader::new(tokio::io::stdin());
    select_many_from(&mut input, title, options).await
}

pub async fn select_many_from<R: AsyncBufRead + Unpin>(
    input: &mut R,
    title: &str,
    options: &[String],
) -> Result<Vec<String>> {
    if options.is_empty() {
        return Ok(Vec::new());
    }
    print_options(title, options);

    loop {
        print_prompt("Enter numbers separated by commas or spaces, or 'all': ");
        let line = read_line(input).await?;
        match parse_selection(&line, options.len()) {
            Some(picked) => return Ok(picked.into_iter().map(|i| options[i].clone()).collect()),
            None => println!("{}", "Invalid selection".yellow()),
        }
    }
}
