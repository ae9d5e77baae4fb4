use dioxus::prelude::*;
use nebula_core::topology::{self, NodeKind};
use nebula_core::Session;

use crate::ui::topology_layout::{bezier_path, node_radius, Layout, CANVAS_HEIGHT, CANVAS_WIDTH};

fn kind_class(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Core => "topo-node topo-core",
        NodeKind::Device => "topo-node topo-device",
        NodeKind::Server => "topo-node topo-server",
        NodeKind::Service => "topo-node topo-service",
    }
}

#[component]
pub fn Topology() -> Element {
    let session = use_context::<Signal<Option<Session>>>();

    // Only the snapshot matters here; drag state on the session is ignored.
    let layout = use_memo(move || {
        session.read().as_ref().map(|s| {
            let graph = topology::project(&s.snapshot);
            let mut layout = Layout::new(&graph);
            layout.settle();
            (layout, graph.gateway)
        })
    });

    let Some((layout, gateway)) = layout() else {
        return rsx! {};
    };
    let gateway_text = match gateway.and_then(|id| layout.nodes.iter().find(|n| n.id == id)) {
        Some(node) => format!("Gateway: {}", node.label.lines().next().unwrap_or_default()),
        None => "No gateway detected".to_string(),
    };

    rsx! {
        div { class: "page topology",
            div { class: "toolbar",
                h2 { "Network Topology" }
                span { class: "topo-gateway", "{gateway_text}" }
            }
            div { class: "topology-canvas",
                svg {
                    class: "topology-svg",
                    width: "{CANVAS_WIDTH}",
                    height: "{CANVAS_HEIGHT}",
                    view_box: "0 0 {CANVAS_WIDTH} {CANVAS_HEIGHT}",

                    for (i, &(from, to)) in layout.edges.iter().enumerate() {
                        {
                            let d = bezier_path(layout.nodes[from].position, layout.nodes[to].position);
                            rsx! {
                                path {
                                    key: "edge-{i}",
                                    d: "{d}",
                                    class: "topo-edge",
                                    fill: "none",
                                    stroke_width: "2",
                                }
                            }
                        }
                    }

                    for node in layout.nodes.iter() {
                        {
                            let radius = node_radius(node.kind);
                            let label_y = radius + 14.0;
                            let class = kind_class(node.kind);
                            let (x, y) = (node.position.x, node.position.y);
                            rsx! {
                                g {
                                    key: "{node.id}",
                                    class,
                                    transform: "translate({x} {y})",
                                    title { "{node.title}" }
                                    circle { r: "{radius}" }
                                    text {
                                        class: "topo-label",
                                        text_anchor: "middle",
                                        y: "{label_y}",
                                        for (line_no, line) in node.label.lines().enumerate() {
                                            tspan {
                                                key: "{line_no}",
                                                x: "0",
                                                dy: if line_no == 0 { "0" } else { "1.2em" },
                                                "{line}"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
