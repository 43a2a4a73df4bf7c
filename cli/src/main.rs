mod ops;

use std::env;
use std::path::PathBuf;

use keyshard_sharing::Scheme;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let cmd = &args[1];

    match cmd.as_str() {
        "encrypt" => {
            let config = match parse_encrypt_args(&args[2..]) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ {e}");
                    std::process::exit(1);
                }
            };
            if let Err(e) = ops::encrypt(&config) {
                eprintln!("❌ Error encrypting: {e}");
                std::process::exit(1);
            }
        }
        "decrypt" => {
            let config = match parse_decrypt_args(&args[2..]) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ {e}");
                    std::process::exit(1);
                }
            };
            if let Err(e) = ops::decrypt(&config) {
                eprintln!("❌ Error decrypting: {e}");
                std::process::exit(1);
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        _ => {
            println!("❌ Unknown command: {cmd}");
            println!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Keyshard CLI - Threshold Secret Sharing for File Encryption");
    println!();
    println!("USAGE:");
    println!("  keyshard <command> [options]");
    println!();
    println!("COMMANDS:");
    println!("  encrypt                    Seal a file and split its key into n fragments");
    println!("  decrypt                    Combine fragments and unseal a file");
    println!("  help                       Show this help message");
    println!();
    println!("ENCRYPT OPTIONS:");
    println!("  --scheme <name>            geometric | polynomial | congruence");
    println!("  --in <file>                Plaintext input file");
    println!("  --out <file>               Ciphertext output file");
    println!("  --keys <file>              Fragment output file, one fragment per line");
    println!("  -n <count>                 Total number of fragments to generate");
    println!("  -k <count>                 Fragments needed to recover the key");
    println!();
    println!("DECRYPT OPTIONS:");
    println!("  --scheme <name>            Scheme the fragments were produced with");
    println!("  --in <file>                Ciphertext input file");
    println!("  --out <file>               Plaintext output file");
    println!("  --keys <file>              File holding at least k gathered fragments");
    println!();
    println!("EXAMPLES:");
    println!("  keyshard encrypt --scheme polynomial --in report.pdf \\");
    println!("      --out report.enc --keys keys.txt -n 5 -k 3");
    println!("  keyshard decrypt --scheme polynomial --in report.enc \\");
    println!("      --out report.pdf --keys keys.txt");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("  RUST_LOG                   Log level (debug/info/warn/error)");
}

/// Common `--flag value` pairs shared by both commands
struct CommonArgs {
    scheme: Option<Scheme>,
    infile: Option<PathBuf>,
    outfile: Option<PathBuf>,
    keysfile: Option<PathBuf>,
    n: Option<usize>,
    k: Option<usize>,
}

fn parse_common(args: &[String]) -> Result<CommonArgs, String> {
    let mut common = CommonArgs {
        scheme: None,
        infile: None,
        outfile: None,
        keysfile: None,
        n: None,
        k: None,
    };

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args
            .get(i + 1)
            .ok_or_else(|| format!("missing value for {flag}"))?;
        match flag {
            "--scheme" => common.scheme = Some(value.parse()?),
            "--in" => common.infile = Some(PathBuf::from(value)),
            "--out" => common.outfile = Some(PathBuf::from(value)),
            "--keys" => common.keysfile = Some(PathBuf::from(value)),
            "-n" => {
                common.n = Some(value.parse().map_err(|_| format!("invalid -n '{value}'"))?)
            }
            "-k" => {
                common.k = Some(value.parse().map_err(|_| format!("invalid -k '{value}'"))?)
            }
            _ => return Err(format!("unknown option {flag}")),
        }
        i += 2;
    }

    Ok(common)
}

fn require<T>(value: Option<T>, flag: &str) -> Result<T, String> {
    value.ok_or_else(|| format!("missing required option {flag}"))
}

fn parse_encrypt_args(args: &[String]) -> Result<ops::EncryptConfig, String> {
    let common = parse_common(args)?;
    Ok(ops::EncryptConfig {
        scheme: require(common.scheme, "--scheme")?,
        infile: require(common.infile, "--in")?,
        outfile: require(common.outfile, "--out")?,
        keysfile: require(common.keysfile, "--keys")?,
        n: require(common.n, "-n")?,
        k: require(common.k, "-k")?,
    })
}

fn parse_decrypt_args(args: &[String]) -> Result<ops::DecryptConfig, String> {
    let common = parse_common(args)?;
    if common.n.is_some() || common.k.is_some() {
        return Err("-n and -k only apply to encrypt".into());
    }
    Ok(ops::DecryptConfig {
        scheme: require(common.scheme, "--scheme")?,
        infile: require(common.infile, "--in")?,
        outfile: require(common.outfile, "--out")?,
        keysfile: require(common.keysfile, "--keys")?,
    })
}
