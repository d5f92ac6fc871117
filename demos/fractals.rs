use subcommand_args::convert::{parse_scaled_int, supersampling, DeviceId, Rectangle, Size};
use subcommand_args::{Choice, Command, ParseError, Parser, Switch, Value};
use tracing_subscriber::filter::LevelFilter;

const CONSOLE_WIDTH: usize = 79;

const FORMATS: [&str; 5] = ["png", "bmp", "gif", "jpg", "jpeg"];

const DEFAULT_AREA: Rectangle = Rectangle {
    x: -2.1,
    y: -1.5,
    width: 3.0,
    height: 3.0,
};

fn palettes() -> Vec<String> {
    let mut names = vec!["grey".to_string()];
    names.extend((1..=4).map(|i| format!("cyclic{i:02}")));
    names.extend((1..=16).map(|i| format!("dark{i:02}")));
    names.extend((1..=18).map(|i| format!("normal{i:02}")));
    names
}

struct Render {
    device: Value<DeviceId>,
    size: Value<Size>,
    fp64: Switch,
    output: Value<String>,
    format: Choice,
    maxiter: Value<i32>,
    supersampling: Value<Size>,
}

impl Render {
    fn new(output_required: bool) -> Self {
        let mut output = Value::new(
            "output",
            "Output file name, e.g. 'mandelbrot.png'. Must end with a valid image format \
             extension unless --format is specified.",
            |value: &str| {
                if value.is_empty() {
                    return Err(ParseError::InvalidValue(
                        "Output file name must not be empty!".to_string(),
                    ));
                }
                Ok(value.to_string())
            },
        )
        .short("o");

        if output_required {
            output = output.make_required();
        }

        Render {
            device: Value::parsed(
                "device",
                "Device used for calculation, as an id like '0.0'. Defaults to '0.0'.",
            )
            .short("d"),
            size: Value::parsed(
                "size",
                "Image size in pixels in the form 'wxh' (e.g. '500x300' or '5kx5k'). \
                 Defaults to '512x512'.",
            )
            .short("s"),
            fp64: Switch::new("fp64", "Use high precision floats for calculation"),
            output,
            format: Choice::new(
                "format",
                "Output file format. Takes priority over the output file name extension.",
                FORMATS,
            )
            .short("f"),
            maxiter: Value::new(
                "maxiter",
                "Maximum iteration count. Must be a positive integer. Defaults to '120'.",
                |value: &str| match parse_scaled_int(value) {
                    Ok(n) if n > 0 => Ok(n),
                    _ => Err(ParseError::InvalidValue(
                        "value for argument --maxiter must be a positive integer.".to_string(),
                    )),
                },
            )
            .short("i"),
            supersampling: Value::new(
                "supersampling",
                "Amount of subpixels per pixel in the form 'wxh' or a single square number. \
                 Defaults to '1'.",
                supersampling,
            ),
        }
    }

    fn arguments(&self) -> Vec<Box<dyn subcommand_args::Argument>> {
        vec![
            self.device.clone().into(),
            self.size.clone().into(),
            self.fp64.clone().into(),
            self.output.clone().into(),
            self.format.clone().into(),
            self.maxiter.clone().into(),
            self.supersampling.clone().into(),
        ]
    }

    fn describe(&self, fractal: &str) {
        let size = self.size.value().unwrap_or(Size::new(512, 512));
        let device = self.device.value().map_or("0.0".to_string(), |d| d.to_string());
        let output = self.output.value().unwrap_or_else(|| format!("{fractal}.png"));
        let format = self.format.value().unwrap_or_else(|| "png".to_string());
        let samples = self.supersampling.value().unwrap_or(Size::new(1, 1));

        println!("{fractal}: {size} pixels on device {device} -> {output} ({format})");
        println!(
            "  max iterations {}, {} subpixels per pixel, {} precision",
            self.maxiter.value().unwrap_or(120),
            samples.area(),
            if self.fp64.was_parsed() { "double" } else { "single" }
        );
    }
}

fn print_help(parser: &Parser, commands: &[&Command]) {
    println!("fractals {}", env!("CARGO_PKG_VERSION"));
    println!("Usage: fractals (command) [arguments].\n\nAvailable commands:");
    println!("{}", parser.list_commands(CONSOLE_WIDTH));

    if parser.arguments(None).is_some_and(|a| !a.is_empty()) {
        println!("\nGeneral arguments:");
        println!("{}", parser.list_arguments(CONSOLE_WIDTH, None));
    }

    for &cmd in commands {
        if parser.arguments(Some(cmd)).map_or(true, |a| a.is_empty()) {
            continue;
        }
        println!("\nAvailable arguments when using command '{}':", cmd.name());
        println!("{}", parser.list_arguments(CONSOLE_WIDTH, Some(cmd)));
    }
}

struct Clinfo {
    device: Value<DeviceId>,
    platform: Value<u32>,
}

impl Clinfo {
    fn new() -> Self {
        Clinfo {
            device: Value::parsed(
                "device",
                "Only show the device with this id, in the form 'x.y' (e.g. '0.1').",
            )
            .short("d"),
            platform: Value::parsed("platform", "Only show the devices of this platform.")
                .short("p"),
        }
    }

    fn arguments(&self) -> Vec<Box<dyn subcommand_args::Argument>> {
        vec![self.device.clone().into(), self.platform.clone().into()]
    }

    fn describe(&self) {
        match (self.device.value(), self.platform.value()) {
            (Some(device), _) => println!("clinfo: device {device}"),
            (None, Some(platform)) => println!("clinfo: all devices of platform {platform}"),
            (None, None) => println!("clinfo: all platforms and devices"),
        }
    }
}

pub fn main() -> anyhow::Result<()> {
    let help = Command::new("help", "displays help on how to use this application.");
    let listpalettes = Command::new("listpalettes", "lists the available color palettes.");
    let clinfo = Command::new("clinfo", "shows information about the available devices.");
    let multibrot = Command::new(
        "multibrot",
        "creates fractals similar to the popular mandelbrot fractal.",
    );
    let newton = Command::new("newton", "(Experimental) creates newton fractals.");
    let buddhabrot = Command::new("buddhabrot", "(Experimental) creates buddhabrot fractals.");

    let verbose = Switch::new("verbose", "log how the command line was resolved").short("v");

    let multibrot_args = Render::new(false);
    let newton_args = Render::new(true);
    let buddhabrot_args = Render::new(false);
    let clinfo_args = Clinfo::new();
    let area = Value::<Rectangle>::parsed(
        "area",
        "Area of the complex plane to render, as 'Re(z) Im(z) Re(w-z) Im(w-z)' where z is the \
         lower left and w the upper right corner. Defaults to '-2.1 -1.5 3 3'.",
    )
    .short("a");

    let mut multibrot_list = multibrot_args.arguments();
    multibrot_list.push(area.clone().into());

    let mut parser = Parser::new();
    parser.add_general_argument(verbose.clone());
    parser.put_command(help.clone(), vec![]);
    parser.put_command(listpalettes.clone(), vec![]);
    parser.put_command(clinfo.clone(), clinfo_args.arguments());
    parser.put_command(multibrot.clone(), multibrot_list);
    parser.put_command(newton.clone(), newton_args.arguments());
    parser.put_command(buddhabrot.clone(), buddhabrot_args.arguments());

    let args = std::env::args().skip(1).collect::<Vec<_>>();

    if let Err(e) = parser.parse_from(args.clone()) {
        eprintln!("{}: {}", e.kind(), e);
        std::process::exit(1);
    }

    if verbose.was_parsed() {
        tracing_subscriber::fmt()
            .with_max_level(LevelFilter::DEBUG)
            .init();
        // parse again so the resolution shows up in the log, the outcome is the same
        parser.parse_from(args)?;
    }

    if help.was_parsed() {
        print_help(
            &parser,
            &[&help, &listpalettes, &clinfo, &multibrot, &newton, &buddhabrot],
        );
    } else if listpalettes.was_parsed() {
        println!("Available palettes:");
        for name in palettes() {
            println!("  {name}");
        }
    } else if clinfo.was_parsed() {
        clinfo_args.describe();
    } else if multibrot.was_parsed() {
        multibrot_args.describe("multibrot");
        println!("  area {}", area.value().unwrap_or(DEFAULT_AREA));
    } else if newton.was_parsed() {
        newton_args.describe("newton");
    } else if buddhabrot.was_parsed() {
        buddhabrot_args.describe("buddhabrot");
    }

    Ok(())
}
