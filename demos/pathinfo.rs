//! Tool that reads PostScript path and reports its geometric properties
use pathgeom::*;
use std::{env, fs::File, io::Read};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

type Error = Box<dyn std::error::Error>;

#[derive(Debug)]
struct Args {
    input_file: String,
    other_file: Option<String>,
    epsilon: Scalar,
    params: Vec<Scalar>,
    options: NormalizeOptions,
}

impl Args {
    fn parse() -> Result<Args, Error> {
        let mut result = Args {
            input_file: String::new(),
            other_file: None,
            epsilon: DEFAULT_EPSILON,
            params: Vec::new(),
            options: NormalizeOptions::default(),
        };
        let mut positional = 0;
        let mut args = env::args();
        let cmd = args.next().unwrap_or_else(|| "pathinfo".to_owned());
        while let Some(arg) = args.next() {
            match arg.as_ref() {
                "-h" => {
                    positional = 0;
                    break;
                }
                "-e" => {
                    let epsilon: Scalar = args.next().ok_or("-e requires argument")?.parse()?;
                    if epsilon < EPSILON {
                        return Err("epsilon is too small".into());
                    }
                    result.epsilon = epsilon;
                }
                "-s" => {
                    result.options.arc_step = args.next().ok_or("-s requires argument")?.parse()?;
                }
                "-m" => {
                    let merge = args.next().ok_or("-m requires argument")?.parse()?;
                    result.options.merge_epsilon = Some(merge);
                }
                "-t" => {
                    let param = args.next().ok_or("-t requires argument")?.parse()?;
                    result.params.push(param);
                }
                _ => {
                    positional += 1;
                    match positional {
                        1 => result.input_file = arg,
                        2 => result.other_file = Some(arg),
                        _ => return Err("unexpected positional argument".into()),
                    }
                }
            }
        }
        if positional < 1 {
            eprintln!("Tool that reads PostScript path and reports its geometric properties");
            eprintln!("\nUSAGE:");
            eprintln!(
                "    {} [-e <epsilon>] [-s <arc_step>] [-m <merge>] [-t <param>].. <file.ps> [<other.ps>]",
                cmd
            );
            eprintln!("\nARGS:");
            eprintln!(
                "    -e <epsilon>   accuracy of arc length and intersection (default: {})",
                DEFAULT_EPSILON
            );
            eprintln!(
                "    -s <arc_step>  maximum angle of a cubic approximating an arc (default: {})",
                DEFAULT_ARC_STEP
            );
            eprintln!("    -m <merge>     merge segments shorter than this value");
            eprintln!("    -t <param>     report point and tangent at path parameter");
            eprintln!("    <file.ps>      file containing PostScript path ('-' means stdin)");
            eprintln!("    <other.ps>     report intersections with this path");
            std::process::exit(1);
        }
        Ok(result)
    }
}

/// Load path from the file
fn path_load(path: &str) -> Result<Path, Error> {
    let mut contents = String::new();
    if path != "-" {
        let mut file = File::open(path)?;
        file.read_to_string(&mut contents)?;
    } else {
        std::io::stdin().read_to_string(&mut contents)?;
    }
    Ok(tracing::debug_span!("[parse]").in_scope(|| contents.parse())?)
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse()?;
    let path = path_load(&args.input_file)?;
    let norm = path.normalize_with(&args.options)?;

    println!("elements:  {}", path.len());
    println!("subpaths:  {}", norm.subpaths().len());
    println!("segments:  {}", norm.segments_count());
    println!("range:     {}", norm.range());
    if let Some(bbox) = path.bbox() {
        println!("bbox:      {:?}", bbox);
    }
    if let Some(bbox) = norm.bbox() {
        println!("hull bbox: {:?}", bbox);
    }
    println!("arclength: {}", norm.arclength(args.epsilon));
    for t in args.params.iter().copied() {
        match (norm.at(t), norm.tangent(t, Some(1.0))) {
            (Some(point), Some(tangent)) => {
                println!("at {}: {:?} direction {:?}", t, point, tangent.direction())
            }
            (Some(point), None) => println!("at {}: {:?}", t, point),
            _ => println!("at {}: out of range", t),
        }
    }
    // each self crossing is reported in both orders
    let crossings: Vec<_> = norm
        .intersect(&norm, args.epsilon)
        .into_iter()
        .filter(|(ta, tb)| ta < tb)
        .collect();
    println!("self-intersections: {}", crossings.len());
    for (ta, tb) in crossings {
        if let Some(point) = norm.at(ta) {
            println!("    {:?} at {} {}", point, ta, tb);
        }
    }
    if let Some(other_file) = &args.other_file {
        let other = path_load(other_file)?.normalize_with(&args.options)?;
        let intersections = norm.intersect(&other, args.epsilon);
        println!("intersections: {}", intersections.len());
        for (ta, tb) in intersections {
            if let Some(point) = norm.at(ta) {
                println!("    {:?} at {} {}", point, ta, tb);
            }
        }
    }
    Ok(())
}
