use clap::Parser;
use pendula::formats::parse_fragment;
use pendula::{Scene, SceneConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
	#[arg(help = "A share link, or just the part after its '#'")]
	link: String,

	#[arg(short, long, help = "Simulate this many steps after loading (the scene is resumed first)")]
	steps: Option<usize>,
}

fn main() {
	tracing_subscriber::fmt::init();
	let cli = Cli::parse();

	let fragment = match cli.link.split_once('#') {
		Some((_, fragment)) => fragment,
		None => cli.link.as_str(),
	};

	let snapshot = match parse_fragment(fragment) {
		Ok(snapshot) => snapshot,
		Err(e) => {
			eprintln!("{e}");
			std::process::exit(1);
		}
	};

	let mut scene = Scene::new(SceneConfig::default());
	scene.import_snapshot(&snapshot);

	if let Some(steps) = cli.steps {
		scene.set_paused(false);
		for _ in 0..steps {
			scene.tick();
		}
	}

	println!("== Scene ==");
	println!("gravity slider: {} (internal {})", scene.gravity_slider(), scene.gravity());
	println!("running: {}", scene.is_running());
	println!("== Pendulums ==");
	for pendulum in scene.pendulums() {
		println!("{} {} trail {}", pendulum.id(), pendulum.color, pendulum.trail_length);
		let [joint, tip] = pendulum.joint_positions(scene.config().anchor);
		for (link, end) in pendulum.links.iter().zip([joint, tip]) {
			println!(
				"  length {:>8.2}  mass {:>6.2}  angle {:>8.2}°  end ({:.1}, {:.1})",
				link.length,
				link.mass(),
				link.angle.to_degrees(),
				end.x,
				end.y
			);
		}
	}
}
