//! Fingerprint calculator.
//!
//! Prints the fingerprint a product will be keyed by on the ledger, without
//! touching the network:
//!
//!   authenticity-engine "Bag A" Black "Togo Leather" 1000 2024

use authenticity_engine::{derive_fingerprint, ProductAttributes, FINGERPRINT_SCHEME};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: authenticity-engine <name> <color> <material> <price> [year]\n\
         \n\
         price is in minor currency units; year defaults to the current year."
    );
    std::process::exit(2);
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") || !(4..=5).contains(&args.len()) {
        usage_and_exit();
    }

    let price: u64 = args[3]
        .parse()
        .map_err(|e| anyhow::anyhow!("price `{}` is not a non-negative integer: {}", args[3], e))?;
    let year: Option<u32> = match args.get(4) {
        Some(y) => Some(
            y.parse()
                .map_err(|e| anyhow::anyhow!("year `{}` is not a valid year: {}", y, e))?,
        ),
        None => None,
    };

    let attrs = ProductAttributes::new(args[0].as_str(), args[1].as_str(), args[2].as_str(), price, year);
    attrs.validate()?;

    println!("{}", derive_fingerprint(&attrs));
    eprintln!("(scheme {}, year {})", FINGERPRINT_SCHEME, attrs.year);
    Ok(())
}
