//! This is the command line driver that builds a couple of demo graphs,
//! runs node placement and component packing on them, and prints the
//! resulting geometry.

extern crate clap;
extern crate env_logger;
extern crate log;

use clap::{Arg, ArgAction, Command};

use layered::core::base::{NodeKind, PortSide};
use layered::core::geometry::Point;
use layered::core::options::LayoutOptions;
use layered::pack;
use layered::topo::graph::{LayeredGraph, NodeHandle};
use layered::topo::placer::{verifier, PlacementStrategy, Placer};

/// A node with a square box and a margin of zero.
fn box_node(graph: &mut LayeredGraph, size: f64) -> NodeHandle {
    let n = graph.add_node(NodeKind::Normal);
    graph.node_mut(n).size = Point::new(size, size);
    n
}

/// Two fan-in stages feeding one sink through a long edge; enough to watch
/// the placer balance and straighten.
fn build_placement_demo(options: LayoutOptions) -> LayeredGraph {
    let mut graph = LayeredGraph::new(options);

    let a0 = box_node(&mut graph, 20.);
    let a1 = box_node(&mut graph, 20.);
    let a2 = box_node(&mut graph, 20.);
    let b0 = box_node(&mut graph, 30.);
    let b1 = box_node(&mut graph, 20.);
    let dummy = graph.add_node(NodeKind::LongEdge);
    let c0 = box_node(&mut graph, 25.);

    for (from, to) in [(a0, b0), (a1, b0), (a2, b1), (b0, c0)] {
        let p = graph.add_port(from, PortSide::East);
        let q = graph.add_port(to, PortSide::West);
        graph.add_edge(p, q);
    }
    // The long edge b1 -> c0 runs through a dummy.
    let p = graph.add_port(b1, PortSide::East);
    let q = graph.add_port(dummy, PortSide::West);
    graph.add_edge(p, q);
    let p = graph.add_port(dummy, PortSide::East);
    let q = graph.add_port(c0, PortSide::West);
    graph.add_edge(p, q);

    graph.set_layers(vec![vec![a0, a1, a2], vec![b0, b1], vec![dummy], vec![c0]]);
    graph
}

/// A handful of disconnected boxes of different sizes for the packer.
fn build_packing_demo(options: &LayoutOptions) -> Vec<LayeredGraph> {
    let sizes = [(60., 40.), (30., 30.), (80., 20.), (25., 55.)];
    sizes
        .iter()
        .map(|&(w, h)| {
            let mut component = LayeredGraph::new(options.clone());
            let n = component.add_node(NodeKind::Normal);
            component.node_mut(n).size = Point::new(w, h);
            component.size = Point::new(w, h);
            component
        })
        .collect()
}

fn run_placement(options: LayoutOptions, strategy: PlacementStrategy) {
    let mut graph = build_placement_demo(options);
    Placer::new(&mut graph).place(strategy);
    verifier::do_it(&graph);

    println!("placement ({:?}):", strategy);
    for n in graph.iter_nodes() {
        let node = graph.node(n);
        println!(
            "  node {:>2}  kind {:?}  layer {}  y {:.1}",
            n.get_index(),
            node.kind,
            node.layer,
            node.pos.y
        );
    }
}

fn run_packing(options: &LayoutOptions) {
    let components = build_packing_demo(options);
    let mut target = LayeredGraph::new(options.clone());
    pack::combine(components, &mut target);

    println!("packing:");
    for n in target.iter_nodes() {
        let node = target.node(n);
        println!(
            "  node {:>2}  at {}  size {}",
            n.get_index(),
            node.pos,
            node.size
        );
    }
    println!("  graph size {}", target.size);
}

fn main() {
    let matches = Command::new("layered")
        .version("0.1")
        .arg(
            Arg::new("strategy")
                .short('s')
                .long("strategy")
                .value_name("STRATEGY")
                .help("Node placement strategy: simplex or linear")
                .default_value("simplex"),
        )
        .arg(
            Arg::new("thoroughness")
                .short('t')
                .long("thoroughness")
                .value_name("N")
                .help("Trade time for quality")
                .default_value("7"),
        )
        .arg(
            Arg::new("straight")
                .long("straight")
                .action(ArgAction::SetTrue)
                .help("Favor straight edges during placement"),
        )
        .arg(
            Arg::new("compact")
                .long("compact")
                .action(ArgAction::SetTrue)
                .help("Compact the packed components"),
        )
        .get_matches();

    env_logger::builder().format_timestamp(None).init();

    let mut options = LayoutOptions::default();
    options.favor_straight_edges = matches.get_flag("straight");
    options.compact_components = matches.get_flag("compact");
    options.thoroughness = matches
        .get_one::<String>("thoroughness")
        .unwrap()
        .parse()
        .expect("thoroughness must be an integer");

    let strategy = match matches.get_one::<String>("strategy").unwrap().as_str() {
        "linear" => PlacementStrategy::LinearSegments,
        _ => PlacementStrategy::NetworkSimplex,
    };

    run_placement(options.clone(), strategy);
    run_packing(&options);
}
