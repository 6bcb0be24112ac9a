use std::env;
use std::fs;
use std::process;

use serde::Serialize;

use qr_encoder::render::{parse_hex_color, to_image_buffer, to_svg_string};
use qr_encoder::{ErrorCorrection, MaskPattern, OutputFormat, QrCode, QrConfig, Segment, Version};

#[derive(Debug, Serialize)]
struct SymbolReport<'a> {
    version: Version,
    size: usize,
    error_correction: ErrorCorrection,
    mask_pattern: MaskPattern,
    data_codewords: usize,
    dark_modules: usize,
    output: &'a str,
}

fn print_help(program_name: &str) {
    println!("Usage: {} [options]", program_name);
    println!();
    println!("Options:");
    println!("  --data, -d <text>          Text to encode (default: https://www.example.com/)");
    println!("  --output, -o <file>        Output file, .png/.jpg/.svg (default: qr-code.png)");
    println!("  --ecc, -l [L|M|Q|H]        Error correction level (default: M)");
    println!("  --mask, -m [0-7|auto]      Mask pattern (default: auto)");
    println!("  --no-boost                 Keep the requested ECC level, never raise it");
    println!("  --pixel-size, -p <px>      Raster edge length in pixels (default: 512)");
    println!("  --border, -b <modules>     Quiet zone width in modules (default: 4)");
    println!("  --foreground, -f <#RRGGBB> Module color (default: #000000)");
    println!("  --background, -g <#RRGGBB> Background color (default: #FFFFFF)");
    println!("  --highlight-finders        Draw the three finder patterns in red");
    println!("  --json                     Print a JSON report of the symbol");
    println!("  --verbose, -V              Print symbol details");
    println!("  --help, -h                 Show this help message");
}

fn require_value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i + 1) {
        Some(value) => value,
        None => {
            eprintln!("{} requires a value.", flag);
            process::exit(1);
        }
    }
}

fn parse_args(args: &[String]) -> QrConfig {
    let mut config = QrConfig::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--data" | "-d" => {
                config.data = require_value(args, i, "--data").to_string();
                i += 1;
            }
            "--output" | "-o" => {
                config.output_filename = require_value(args, i, "--output").to_string();
                i += 1;
            }
            "--ecc" | "-l" => {
                config.error_correction = match require_value(args, i, "--ecc") {
                    "L" => ErrorCorrection::L,
                    "M" => ErrorCorrection::M,
                    "Q" => ErrorCorrection::Q,
                    "H" => ErrorCorrection::H,
                    other => {
                        eprintln!("Invalid ECC level {:?}. Use L, M, Q, or H.", other);
                        process::exit(1);
                    }
                };
                i += 1;
            }
            "--mask" | "-m" => {
                let value = require_value(args, i, "--mask");
                config.mask_pattern = if value == "auto" {
                    None
                } else {
                    match value.parse::<u8>().map(MaskPattern::from_value) {
                        Ok(Ok(pattern)) => Some(pattern),
                        _ => {
                            eprintln!("Invalid mask {:?}. Use 0-7 or auto.", value);
                            process::exit(1);
                        }
                    }
                };
                i += 1;
            }
            "--no-boost" => config.boost_ecl = false,
            "--pixel-size" | "-p" => {
                let value = require_value(args, i, "--pixel-size");
                config.pixel_size = match value.parse() {
                    Ok(px) => px,
                    Err(_) => {
                        eprintln!("Invalid pixel size {:?}.", value);
                        process::exit(1);
                    }
                };
                i += 1;
            }
            "--border" | "-b" => {
                let value = require_value(args, i, "--border");
                config.border = match value.parse() {
                    Ok(border) => border,
                    Err(_) => {
                        eprintln!("Invalid border {:?}.", value);
                        process::exit(1);
                    }
                };
                i += 1;
            }
            "--foreground" | "-f" => {
                config.foreground = require_value(args, i, "--foreground").to_string();
                i += 1;
            }
            "--background" | "-g" => {
                config.background = require_value(args, i, "--background").to_string();
                i += 1;
            }
            "--highlight-finders" => config.highlight_finders = true,
            "--json" => config.json = true,
            "--verbose" | "-V" => config.verbose = true,
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}. Use --help for usage information.", other);
                process::exit(1);
            }
        }
        i += 1;
    }
    config
}

fn dark_module_count(qr: &QrCode) -> usize {
    let size = qr.size() as i32;
    let mut count = 0;
    for y in 0..size {
        for x in 0..size {
            if qr.get_module(x, y) {
                count += 1;
            }
        }
    }
    count
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let config = parse_args(&args);

    let segments = Segment::make_segments(&config.data)?;
    let qr = QrCode::encode_segments(
        &segments,
        config.error_correction,
        Version::MIN,
        Version::MAX,
        config.mask_pattern,
        config.boost_ecl,
    )?;

    match OutputFormat::from_path(&config.output_filename)? {
        OutputFormat::Svg => {
            let svg = to_svg_string(&qr, config.border as i32)?;
            fs::write(&config.output_filename, svg)?;
        }
        OutputFormat::Png | OutputFormat::Jpeg => {
            let foreground = parse_hex_color(&config.foreground)?;
            let background = parse_hex_color(&config.background)?;
            let highlight = config
                .highlight_finders
                .then(|| parse_hex_color("#C8102E"))
                .transpose()?;
            let image = to_image_buffer(
                &qr,
                config.pixel_size,
                config.border,
                foreground,
                background,
                highlight,
            )?;
            image.save(&config.output_filename)?;
        }
    }

    if config.json {
        let report = SymbolReport {
            version: qr.version(),
            size: qr.size(),
            error_correction: qr.error_correction(),
            mask_pattern: qr.mask_pattern(),
            data_codewords: qr.data_codewords().len(),
            dark_modules: dark_module_count(&qr),
            output: &config.output_filename,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if config.verbose {
        println!("=== QR Code Metadata ===");
        println!("Version: {} ({1}x{1} modules)", qr.version().number(), qr.size());
        println!("Error Correction: {:?}", qr.error_correction());
        println!("Mask Pattern: {:?}", qr.mask_pattern());
        println!("Data Codewords: {}", qr.data_codewords().len());
    }

    println!(
        "QR code saved to {} (version {}, {:?} error correction, {:?})",
        config.output_filename,
        qr.version().number(),
        qr.error_correction(),
        qr.mask_pattern()
    );
    Ok(())
}
