use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use clap::{arg, command, ArgAction, ArgMatches, Command};

use huffpack::{logging, Encoder};

fn main() -> Result<()> {
    let matches = command!()
        .arg(
            arg!(-v --verbose "Log every stage")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("encode")
                .about("Compress a file")
                .arg(arg!(input: <INPUT> "File to compress"))
                .arg(arg!(output: <OUTPUT> "Output path")),
        )
        .subcommand(
            Command::new("decode")
                .about("Decompress a file")
                .arg(arg!(input: <INPUT> "Compressed file"))
                .arg(arg!(output: <OUTPUT> "Output path")),
        )
        .subcommand(
            Command::new("codes")
                .about("Print the code of every byte in a file")
                .arg(arg!(input: <INPUT> "File to analyse")),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print the framing of a compressed file")
                .arg(arg!(input: <INPUT> "Compressed file")),
        )
        .get_matches();

    let verbose = matches.get_one::<bool>("verbose").copied().unwrap_or(false);
    logging::setup_logging(verbose);

    match matches.subcommand() {
        Some(("encode", matches)) => encode_file(matches),
        Some(("decode", matches)) => decode_file(matches),
        Some(("codes", matches)) => print_codes(matches),
        Some(("inspect", matches)) => inspect_file(matches),
        _ => anyhow::bail!("Unknown command"),
    }
}

fn path_arg<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("Missing <{}> argument", name.to_uppercase()))
}

fn open(path: &str) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("Couldn't open {path}"))?;
    Ok(BufReader::new(file))
}

// Output files are only created once the whole result is in memory.
fn write_output(path: &str, data: &[u8]) -> Result<()> {
    std::fs::write(path, data).with_context(|| format!("Couldn't write {path}"))
}

fn encode_file(matches: &ArgMatches) -> Result<()> {
    let input = path_arg(matches, "input")?;
    let output = path_arg(matches, "output")?;

    let mut encoded = Vec::new();
    let summary = huffpack::encode_stream(open(input)?, &mut encoded)
        .with_context(|| format!("Couldn't encode {input}"))?;
    write_output(output, &encoded)?;

    println!(
        "Encoded {} bytes into {} bytes ({} payload bytes, {} distinct symbols)",
        summary.input_len, summary.output_len, summary.payload_len, summary.distinct_symbols
    );
    Ok(())
}

fn decode_file(matches: &ArgMatches) -> Result<()> {
    let input = path_arg(matches, "input")?;
    let output = path_arg(matches, "output")?;

    let mut decoded = Vec::new();
    let len = huffpack::decode_stream(open(input)?, &mut decoded)
        .with_context(|| format!("Couldn't decode {input}"))?;
    write_output(output, &decoded)?;

    println!("Decoded {len} bytes");
    Ok(())
}

fn print_codes(matches: &ArgMatches) -> Result<()> {
    let input = path_arg(matches, "input")?;
    let data = std::fs::read(input).with_context(|| format!("Couldn't read {input}"))?;

    let encoder = Encoder::from_input(&data)?;
    print!("{}", encoder.codes());
    Ok(())
}

fn inspect_file(matches: &ArgMatches) -> Result<()> {
    let input = path_arg(matches, "input")?;
    let data = std::fs::read(input).with_context(|| format!("Couldn't read {input}"))?;

    let info = huffpack::inspect(&data).with_context(|| format!("Couldn't inspect {input}"))?;
    println!("Decoded size:     {} bytes", info.symbols);
    println!("Distinct symbols: {}", info.distinct_symbols);
    println!("Payload:          {} bytes", info.payload_len);
    println!("Code bits:        {}", info.payload_bits);
    println!("Padding bits:     {}", info.payload_len as u64 * 8 - info.payload_bits);
    println!("Tree depth:       {}", info.tree_depth);
    Ok(())
}
