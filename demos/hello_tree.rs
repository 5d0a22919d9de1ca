use tracing_subscriber::EnvFilter;
use yamldirs::{DryRun, Implicit, Node, Sandbox, materialize};

const TREE: &str = "
docs:
  first.txt: Hello
  empty:
second.txt: World
numbers: [1, 2]
";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let tree = Node::from_yaml_str(TREE).unwrap();

    // shows what would be created, without touching the disk
    let mut dry = DryRun::new();
    materialize(&mut dry, &Implicit, &tree).unwrap();
    for op in dry.ops() {
        println!("{}", op);
    }

    // creates the tree in a temporary directory, which also becomes
    // the working directory of the process
    let sandbox = Sandbox::new(&tree).unwrap();
    println!("Sandbox: {}", sandbox.root().display());

    let first = std::fs::read_to_string("docs/first.txt").unwrap();
    let second = std::fs::read_to_string("second.txt").unwrap();
    println!("{}, {}!", first, second);

    // At this point, `sandbox` will be dropped: the working directory
    // is restored and the temporary directory removed.
    // If you want to keep it, use Sandbox::builder().cleanup(false)
}
