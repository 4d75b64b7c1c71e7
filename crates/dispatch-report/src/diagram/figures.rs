//! The report's built-in diagrams.
//!
//! Scenes are authored in user units at their native size; the context
//! decides the raster scale. Random-looking data comes from fixed seeds, so a
//! scene is identical across runs.

use std::path::PathBuf;

use super::{DiagramContext, DiagramGenerator, FigureEntry, FigureLabel, SvgCanvas, heat_color};
use crate::Result;

/// The built-in diagrams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagram {
    /// Boxes-and-arrows view of the platform's subsystems.
    Architecture,
    /// Flowchart from an incoming call to a queued event.
    CallFlow,
    /// Decision flow of vehicle assignment.
    TaskAllocation,
    /// Demand heatmap over the city grid with stations and hospitals.
    GisHeatmap,
    /// Planned route, congestion and the re-planned route on a road grid.
    Routing,
    /// Gantt chart of vehicle trips split into phases.
    Gantt,
    /// Highly available deployment across two zones.
    Deployment,
    /// District-by-hour heatmap of historical incidents.
    Hotspot,
    /// The user roles around the platform.
    UserRoles,
}

impl Diagram {
    /// Draws the diagram for `label`, using `family` for all text.
    pub fn scene(self, label: &FigureLabel, family: &str) -> SvgCanvas {
        match self {
            Diagram::Architecture => architecture(label, family),
            Diagram::CallFlow => call_flow(label, family),
            Diagram::TaskAllocation => task_allocation(label, family),
            Diagram::GisHeatmap => gis_heatmap(label, family),
            Diagram::Routing => routing(label, family),
            Diagram::Gantt => gantt(label, family),
            Diagram::Deployment => deployment(label, family),
            Diagram::Hotspot => hotspot(label, family),
            Diagram::UserRoles => user_roles(label, family),
        }
    }
}

impl DiagramGenerator for Diagram {
    fn generate(&self, ctx: &DiagramContext<'_>, figure: &FigureLabel) -> Result<PathBuf> {
        let canvas = self.scene(figure, ctx.fonts.family());
        ctx.write_scene(&canvas, &figure.file_name)
    }
}

/// The figures of the report, in document order.
pub fn standard_figures() -> Vec<FigureEntry> {
    const FIGURES: [(&str, &str, &str, &str, Diagram); 9] = [
        (
            "2-2",
            "系统总体架构图",
            "System Architecture",
            "fig2-2_system_architecture.png",
            Diagram::Architecture,
        ),
        (
            "2-3",
            "呼叫受理与事件生成流程图",
            "Call Intake and Event Generation Flow",
            "fig2-3_call_flow.png",
            Diagram::CallFlow,
        ),
        (
            "2-4",
            "任务分配决策流程图",
            "Task Allocation Decision Flow",
            "fig2-4_task_allocation.png",
            Diagram::TaskAllocation,
        ),
        (
            "2-5",
            "GIS 资源热力图示意",
            "GIS Resource Heatmap",
            "fig2-5_gis_heatmap.png",
            Diagram::GisHeatmap,
        ),
        (
            "2-6",
            "实时路径规划与重规划示意",
            "Real-time Routing & Re-routing",
            "fig2-6_routing.png",
            Diagram::Routing,
        ),
        (
            "2-7",
            "车辆调度甘特图示例",
            "Vehicle Dispatch Gantt Chart",
            "fig2-7_gantt.png",
            Diagram::Gantt,
        ),
        (
            "2-8",
            "部署与高可用拓扑图",
            "Deployment Topology",
            "fig2-8_deployment.png",
            Diagram::Deployment,
        ),
        (
            "2-9",
            "历史热点时空分析",
            "Historical Hotspot Analysis",
            "fig2-9_hotspot.png",
            Diagram::Hotspot,
        ),
        (
            "2-11",
            "用户角色图",
            "User Roles Diagram",
            "fig2-11_user_roles.png",
            Diagram::UserRoles,
        ),
    ];

    FIGURES
        .into_iter()
        .map(|(number, title, title_en, file_name, diagram)| {
            FigureEntry::new(FigureLabel::new(number, title, title_en, file_name), diagram)
        })
        .collect()
}

const LABEL_SIZE: f64 = 16.0;
const TITLE_SIZE: f64 = 14.0;

/// Anchor points of a box or diamond.
#[derive(Debug, Clone, Copy)]
struct Node {
    cx: f64,
    top: f64,
    w: f64,
    h: f64,
}

impl Node {
    fn top_mid(&self) -> (f64, f64) {
        (self.cx, self.top)
    }

    fn bottom_mid(&self) -> (f64, f64) {
        (self.cx, self.top + self.h)
    }

    fn left_mid(&self) -> (f64, f64) {
        (self.cx - self.w / 2.0, self.top + self.h / 2.0)
    }

    fn right_mid(&self) -> (f64, f64) {
        (self.cx + self.w / 2.0, self.top + self.h / 2.0)
    }
}

fn centered_lines(c: &mut SvgCanvas, cx: f64, top: f64, label: &str) {
    for (idx, line) in label.lines().enumerate() {
        c.centered_text(cx, top + idx as f64 * (LABEL_SIZE + 4.0), LABEL_SIZE, line);
    }
}

fn label_top(top: f64, h: f64, label: &str) -> f64 {
    let lines = label.lines().count().max(1) as f64;
    let text_h = lines * LABEL_SIZE + (lines - 1.0) * 4.0;
    top + (h - text_h) / 2.0
}

fn flow_box(c: &mut SvgCanvas, cx: f64, top: f64, w: f64, h: f64, label: &str) -> Node {
    c.rect(cx - w / 2.0, top, w, h);
    centered_lines(c, cx, label_top(top, h, label), label);
    Node { cx, top, w, h }
}

fn diamond(c: &mut SvgCanvas, cx: f64, cy: f64, w: f64, h: f64, label: &str) -> Node {
    c.outlined_polygon(&[
        (cx, cy - h / 2.0),
        (cx + w / 2.0, cy),
        (cx, cy + h / 2.0),
        (cx - w / 2.0, cy),
    ]);
    let top = cy - h / 2.0;
    centered_lines(c, cx, label_top(top, h, label), label);
    Node { cx, top, w, h }
}

/// A vertical color ramp from high (top) to low (bottom).
fn heat_legend(c: &mut SvgCanvas, x: f64, y: f64, w: f64, h: f64) {
    const STEPS: usize = 12;
    let step = h / STEPS as f64;
    for idx in 0..STEPS {
        let t = 1.0 - idx as f64 / (STEPS - 1) as f64;
        c.filled_rect(x, y + idx as f64 * step, w, step + 0.5, &heat_color(t));
    }
    c.rect(x, y, w, h);
    c.text(x + w + 6.0, y, 12.0, "高 (High)");
    c.text(x + w + 6.0, y + h - 12.0, 12.0, "低 (Low)");
}

fn architecture(label: &FigureLabel, family: &str) -> SvgCanvas {
    const BOXES: [(&str, f64, f64); 8] = [
        ("呼叫受理\n(ASR/NLP)", 50.0, 50.0),
        ("事件生成\n(Event)", 420.0, 50.0),
        ("调度引擎\n(MIP / RL)", 790.0, 50.0),
        ("GIS 地图\n服务", 50.0, 300.0),
        ("路径规划\n& 交通", 420.0, 300.0),
        ("监控看板\n(Dashboard)", 790.0, 300.0),
        ("历史分析\n(Analytics)", 50.0, 520.0),
        ("医院接口\n(HIS)", 420.0, 520.0),
    ];
    const ARROWS: [((f64, f64), (f64, f64)); 6] = [
        ((370.0, 120.0), (420.0, 120.0)),
        ((730.0, 120.0), (790.0, 120.0)),
        ((210.0, 200.0), (210.0, 300.0)),
        ((560.0, 200.0), (560.0, 300.0)),
        ((980.0, 200.0), (980.0, 300.0)),
        ((560.0, 450.0), (560.0, 520.0)),
    ];

    let mut c = SvgCanvas::new(1200, 700, family);
    for (text, x, y) in BOXES {
        c.labeled_box(x, y, 300.0, 140.0, text);
    }
    for (from, to) in ARROWS {
        c.arrow(from, to, 14.0);
    }
    c.text(30.0, 10.0, TITLE_SIZE, &label.caption());
    c
}

fn call_flow(label: &FigureLabel, family: &str) -> SvgCanvas {
    let (cx, w, h) = (400.0, 300.0, 70.0);
    let mut c = SvgCanvas::new(900, 960, family);
    c.text(20.0, 10.0, TITLE_SIZE, &label.caption());

    let call = flow_box(&mut c, cx, 60.0, w, h, "来电接入\n(Incoming Call)");
    let asr = flow_box(&mut c, cx, 180.0, w, h, "语音识别 / 语义解析\n(ASR / NLP)");
    let geo = flow_box(&mut c, cx, 300.0, w, h, "地址解析与定位\n(Geocoding)");
    let check = diamond(&mut c, cx, 490.0, 260.0, 130.0, "信息完整？\n(Complete?)");
    let triage = flow_box(&mut c, cx, 610.0, w, h, "病情分级\n(Triage)");
    let event = flow_box(&mut c, cx, 730.0, w, h, "生成事件单\n(Create Event)");
    let queue = flow_box(&mut c, cx, 850.0, w, h, "进入待分配队列\n(Dispatch Queue)");
    let callback = flow_box(&mut c, 730.0, 455.0, 220.0, h, "回拨核实\n(Call Back)");

    for (from, to) in [
        (call, asr),
        (asr, geo),
        (geo, check),
        (check, triage),
        (triage, event),
        (event, queue),
    ] {
        c.arrow(from.bottom_mid(), to.top_mid(), 12.0);
    }
    c.text(cx + 10.0, check.bottom_mid().1 + 6.0, 14.0, "是 / Yes");

    c.arrow(check.right_mid(), callback.left_mid(), 12.0);
    c.text(check.right_mid().0 + 10.0, check.right_mid().1 - 24.0, 14.0, "否 / No");

    let (bx, by) = callback.top_mid();
    let (gx, gy) = geo.right_mid();
    c.line((bx, by), (bx, gy), 3.0);
    c.arrow((bx, gy), (gx, gy), 12.0);
    c
}

fn task_allocation(label: &FigureLabel, family: &str) -> SvgCanvas {
    let (cx, w, h) = (450.0, 300.0, 70.0);
    let mut c = SvgCanvas::new(1000, 1010, family);
    c.text(20.0, 10.0, TITLE_SIZE, &label.caption());

    let event = flow_box(&mut c, cx, 50.0, w, h, "新事件\n(New Event)");
    let filter = flow_box(&mut c, cx, 160.0, w, h, "候选车辆筛选\n(Candidate Filter)");
    let eta = flow_box(&mut c, cx, 270.0, w, h, "ETA 计算\n(ETA Estimation)");
    let feasible = diamond(&mut c, cx, 440.0, 260.0, 130.0, "满足约束？\n(Feasible?)");
    let solve = flow_box(&mut c, cx, 560.0, w, h, "MIP 求解分配\n(MIP Assignment)");
    let manual = diamond(&mut c, cx, 730.0, 260.0, 130.0, "人工覆写？\n(Override?)");
    let order = flow_box(&mut c, cx, 850.0, w, h, "下发任务\n(Dispatch Order)");
    let cross = flow_box(&mut c, 810.0, 405.0, 220.0, h, "跨区调用\n(Cross-region)");
    let adjust = flow_box(&mut c, 140.0, 695.0, 220.0, h, "调度员调整\n(Manual Adjust)");

    for (from, to) in [
        (event, filter),
        (filter, eta),
        (eta, feasible),
        (feasible, solve),
        (solve, manual),
        (manual, order),
    ] {
        c.arrow(from.bottom_mid(), to.top_mid(), 12.0);
    }
    c.text(cx + 10.0, feasible.bottom_mid().1 + 6.0, 14.0, "是 / Yes");
    c.text(cx + 10.0, manual.bottom_mid().1 + 6.0, 14.0, "否 / No");

    c.arrow(feasible.right_mid(), cross.left_mid(), 12.0);
    c.text(feasible.right_mid().0 + 10.0, feasible.right_mid().1 - 24.0, 14.0, "否 / No");
    let (rx, ry) = cross.top_mid();
    let (fx, fy) = filter.right_mid();
    c.line((rx, ry), (rx, fy), 3.0);
    c.arrow((rx, fy), (fx, fy), 12.0);

    c.arrow(manual.left_mid(), adjust.right_mid(), 12.0);
    c.text(manual.left_mid().0 - 90.0, manual.left_mid().1 - 24.0, 14.0, "是 / Yes");
    let (ax, ay) = adjust.bottom_mid();
    let (ox, oy) = order.left_mid();
    c.line((ax, ay), (ax, oy), 3.0);
    c.arrow((ax, oy), (ox, oy), 12.0);
    c
}

const GIS_ROWS: usize = 16;
const GIS_COLS: usize = 24;
const GIS_SEED: u64 = 2025;

/// Demand intensity in `[0, 1]` per grid cell.
fn gis_intensity() -> Vec<Vec<f64>> {
    // (row, col, weight, spread)
    const CENTERS: [(f64, f64, f64, f64); 4] = [
        (4.0, 6.0, 1.0, 3.0),
        (10.0, 15.0, 0.8, 3.5),
        (3.0, 19.0, 0.6, 2.5),
        (13.0, 4.0, 0.5, 2.0),
    ];

    let mut rng = fastrand::Rng::with_seed(GIS_SEED);
    let mut grid = vec![vec![0.0; GIS_COLS]; GIS_ROWS];
    for (r, row) in grid.iter_mut().enumerate() {
        for (col, cell) in row.iter_mut().enumerate() {
            let demand: f64 = CENTERS
                .iter()
                .map(|&(cr, cc, weight, spread)| {
                    let d2 = (r as f64 - cr).powi(2) + (col as f64 - cc).powi(2);
                    weight * (-d2 / (2.0 * spread * spread)).exp()
                })
                .sum();
            *cell = demand + 0.15 * rng.f64();
        }
    }

    normalize(&mut grid);
    grid
}

fn normalize(grid: &mut [Vec<f64>]) {
    let max = grid.iter().flatten().copied().fold(0.0, f64::max);
    if max > 0.0 {
        grid.iter_mut().flatten().for_each(|v| *v /= max);
    }
}

fn gis_heatmap(label: &FigureLabel, family: &str) -> SvgCanvas {
    const CELL: f64 = 30.0;
    const X0: f64 = 60.0;
    const Y0: f64 = 60.0;
    const STATIONS: [(usize, usize); 6] = [(3, 2), (10, 4), (18, 3), (6, 11), (14, 12), (21, 10)];
    const HOSPITALS: [(usize, usize); 3] = [(8, 7), (17, 8), (2, 14)];

    let center = |(col, row): (usize, usize)| {
        (
            X0 + (col as f64 + 0.5) * CELL,
            Y0 + (row as f64 + 0.5) * CELL,
        )
    };

    let mut c = SvgCanvas::new(1000, 620, family);
    c.text(20.0, 15.0, TITLE_SIZE, &label.caption());

    for (r, row) in gis_intensity().iter().enumerate() {
        for (col, v) in row.iter().enumerate() {
            let color = heat_color(*v);
            c.filled_rect(X0 + col as f64 * CELL, Y0 + r as f64 * CELL, CELL, CELL, &color);
        }
    }
    c.rect(X0, Y0, GIS_COLS as f64 * CELL, GIS_ROWS as f64 * CELL);

    for (idx, cell) in STATIONS.into_iter().enumerate() {
        let (x, y) = center(cell);
        c.circle((x, y), 8.0, "#1f77b4");
        c.text(x + 10.0, y - 20.0, 12.0, &format!("S{}", idx + 1));
    }
    for (idx, cell) in HOSPITALS.into_iter().enumerate() {
        let (x, y) = center(cell);
        c.filled_rect(x - 8.0, y - 8.0, 16.0, 16.0, "#2ca02c");
        c.text(x + 10.0, y - 20.0, 12.0, &format!("H{}", idx + 1));
    }

    heat_legend(&mut c, 820.0, Y0, 30.0, GIS_ROWS as f64 * CELL);

    let legend_y = Y0 + GIS_ROWS as f64 * CELL + 40.0;
    c.circle((X0 + 10.0, legend_y + 8.0), 8.0, "#1f77b4");
    c.text(X0 + 26.0, legend_y, 14.0, "急救站 (Station)");
    c.filled_rect(X0 + 222.0, legend_y, 16.0, 16.0, "#2ca02c");
    c.text(X0 + 246.0, legend_y, 14.0, "医院 (Hospital)");
    c.text(X0 + 440.0, legend_y, 14.0, "颜色 = 需求强度 (Demand)");
    c
}

fn routing(label: &FigureLabel, family: &str) -> SvgCanvas {
    const COLS: usize = 6;
    const ROWS: usize = 4;
    const PLANNED: [(usize, usize); 9] = [
        (0, 0),
        (1, 0),
        (2, 0),
        (3, 0),
        (4, 0),
        (5, 0),
        (5, 1),
        (5, 2),
        (5, 3),
    ];
    const REROUTED: [(usize, usize); 7] = [(2, 0), (2, 1), (3, 1), (4, 1), (4, 2), (4, 3), (5, 3)];
    const CONGESTED: ((usize, usize), (usize, usize)) = ((3, 0), (4, 0));
    const PLANNED_COLOR: &str = "#1f77b4";
    const REROUTED_COLOR: &str = "#2ca02c";
    const CONGESTED_COLOR: &str = "#d62728";

    let node = |(col, row): (usize, usize)| {
        (120.0 + col as f64 * 150.0, 130.0 + row as f64 * 140.0)
    };

    let mut c = SvgCanvas::new(1000, 720, family);
    c.text(20.0, 15.0, TITLE_SIZE, &label.caption());

    for row in 0..ROWS {
        for col in 0..COLS {
            if col + 1 < COLS {
                c.stroke_line(node((col, row)), node((col + 1, row)), 4.0, "#bbbbbb", None);
            }
            if row + 1 < ROWS {
                c.stroke_line(node((col, row)), node((col, row + 1)), 4.0, "#bbbbbb", None);
            }
        }
    }

    for pair in PLANNED.windows(2) {
        c.stroke_line(node(pair[0]), node(pair[1]), 6.0, PLANNED_COLOR, None);
    }
    for pair in REROUTED.windows(2) {
        c.stroke_line(node(pair[0]), node(pair[1]), 6.0, REROUTED_COLOR, Some("12 8"));
    }
    let (from, to) = CONGESTED;
    c.stroke_line(node(from), node(to), 9.0, CONGESTED_COLOR, None);
    let (mx, my) = node(from);
    c.colored_text(mx + 20.0, my - 34.0, 14.0, "拥堵 (Congestion)", CONGESTED_COLOR);

    for row in 0..ROWS {
        for col in 0..COLS {
            c.circle(node((col, row)), 7.0, "#ffffff");
        }
    }

    let (sx, sy) = node(PLANNED[0]);
    c.circle((sx, sy), 13.0, PLANNED_COLOR);
    c.text(sx - 40.0, sy - 40.0, 14.0, "站点 (Station)");
    let (vx, vy) = node(REROUTED[0]);
    c.circle((vx, vy), 11.0, "#ff7f0e");
    c.text(vx - 30.0, vy + 18.0, 14.0, "车辆 (Vehicle)");
    let (ex, ey) = node(PLANNED[PLANNED.len() - 1]);
    c.circle((ex, ey), 13.0, CONGESTED_COLOR);
    c.text(ex - 60.0, ey + 20.0, 14.0, "事件点 (Incident)");

    let legend_y = 660.0;
    for (idx, (text, color, dash)) in [
        ("原规划路径 (Planned)", PLANNED_COLOR, None),
        ("重规划路径 (Re-routed)", REROUTED_COLOR, Some("12 8")),
        ("拥堵路段 (Congested)", CONGESTED_COLOR, None),
    ]
    .into_iter()
    .enumerate()
    {
        let x = 60.0 + idx as f64 * 300.0;
        c.stroke_line((x, legend_y + 8.0), (x + 50.0, legend_y + 8.0), 6.0, color, dash);
        c.text(x + 60.0, legend_y, 14.0, text);
    }
    c
}

fn gantt(label: &FigureLabel, family: &str) -> SvgCanvas {
    const VEHICLES: [&str; 6] = [
        "急救车 A1",
        "急救车 A2",
        "急救车 A3",
        "急救车 A4",
        "急救车 A5",
        "急救车 A6",
    ];
    const PHASES: [(&str, &str); 4] = [
        ("出车 (En route)", "#4e79a7"),
        ("现场 (On scene)", "#f28e2b"),
        ("转运 (Transport)", "#e15759"),
        ("返回 (Return)", "#76b7b2"),
    ];
    // (vehicle, start minute, phase durations)
    const TRIPS: [(usize, f64, [f64; 4]); 7] = [
        (0, 5.0, [12.0, 15.0, 18.0, 10.0]),
        (1, 12.0, [8.0, 20.0, 15.0, 12.0]),
        (2, 0.0, [15.0, 10.0, 22.0, 14.0]),
        (2, 70.0, [9.0, 12.0, 16.0, 8.0]),
        (3, 30.0, [10.0, 18.0, 12.0, 9.0]),
        (4, 45.0, [14.0, 15.0, 20.0, 11.0]),
        (5, 20.0, [7.0, 10.0, 0.0, 8.0]),
    ];
    const X0: f64 = 160.0;
    const Y0: f64 = 80.0;
    const MINUTES: usize = 120;
    const PX: f64 = 7.0;
    const ROW_H: f64 = 60.0;
    const BAR_H: f64 = 30.0;

    let chart_h = VEHICLES.len() as f64 * ROW_H;
    let mut c = SvgCanvas::new(1060, 580, family);
    c.text(20.0, 15.0, TITLE_SIZE, &label.caption());

    for minute in (0..=MINUTES).step_by(10) {
        let x = X0 + minute as f64 * PX;
        c.stroke_line((x, Y0), (x, Y0 + chart_h), 1.0, "#dddddd", None);
        c.centered_text(x, Y0 + chart_h + 6.0, 12.0, &minute.to_string());
    }
    c.centered_text(
        X0 + MINUTES as f64 * PX / 2.0,
        Y0 + chart_h + 28.0,
        14.0,
        "时间 / Time (min)",
    );

    for (idx, name) in VEHICLES.iter().enumerate() {
        c.text(20.0, Y0 + idx as f64 * ROW_H + 22.0, 14.0, name);
    }

    for (vehicle, start, durations) in TRIPS {
        let y = Y0 + vehicle as f64 * ROW_H + (ROW_H - BAR_H) / 2.0;
        let mut t = start;
        for (duration, (_, color)) in durations.iter().zip(PHASES) {
            if *duration > 0.0 {
                c.filled_rect(X0 + t * PX, y, duration * PX, BAR_H, color);
            }
            t += duration;
        }
        c.rect(X0 + start * PX, y, (t - start) * PX, BAR_H);
    }
    c.rect(X0, Y0, MINUTES as f64 * PX, chart_h);

    let legend_y = Y0 + chart_h + 60.0;
    for (idx, (name, color)) in PHASES.into_iter().enumerate() {
        let x = X0 + idx as f64 * 210.0;
        c.filled_rect(x, legend_y, 24.0, 16.0, color);
        c.text(x + 32.0, legend_y, 14.0, name);
    }
    c
}

fn deployment(label: &FigureLabel, family: &str) -> SvgCanvas {
    let mut c = SvgCanvas::new(1100, 770, family);
    c.text(20.0, 10.0, TITLE_SIZE, &label.caption());

    c.labeled_box(440.0, 50.0, 220.0, 80.0, "呼叫中心 / 终端\n(Clients)");
    c.labeled_box(440.0, 170.0, 220.0, 80.0, "负载均衡\n(Load Balancer)");

    for (x, zone, app, solver) in [
        (60.0, "可用区 A (Zone A)", "应用节点 A\n(App Node)", "调度引擎 A\n(Solver)"),
        (580.0, "可用区 B (Zone B)", "应用节点 B\n(App Node)", "调度引擎 B\n(Solver)"),
    ] {
        c.dashed_rect(x, 290.0, 460.0, 150.0);
        c.text(x + 10.0, 296.0, 13.0, zone);
        c.labeled_box(x + 20.0, 330.0, 200.0, 90.0, app);
        c.labeled_box(x + 240.0, 330.0, 200.0, 90.0, solver);
    }
    c.stroke_line((520.0, 375.0), (580.0, 375.0), 2.0, "#555555", Some("6 4"));
    c.centered_text(550.0, 380.0, 12.0, "同步 (Sync)");

    c.labeled_box(80.0, 520.0, 260.0, 90.0, "消息队列\n(MQ)");
    c.labeled_box(420.0, 520.0, 260.0, 90.0, "数据库 主/从\n(DB Primary/Replica)");
    c.labeled_box(760.0, 520.0, 260.0, 90.0, "缓存\n(Redis Cache)");
    c.labeled_box(420.0, 660.0, 260.0, 80.0, "异地备份\n(Off-site Backup)");

    for (from, to) in [
        ((550.0, 130.0), (550.0, 170.0)),
        ((500.0, 250.0), (290.0, 290.0)),
        ((600.0, 250.0), (810.0, 290.0)),
        ((210.0, 440.0), (210.0, 520.0)),
        ((290.0, 440.0), (500.0, 520.0)),
        ((810.0, 440.0), (600.0, 520.0)),
        ((930.0, 440.0), (890.0, 520.0)),
        ((550.0, 610.0), (550.0, 660.0)),
    ] {
        c.arrow(from, to, 12.0);
    }
    c
}

const DISTRICTS: [&str; 8] = [
    "城东区", "城西区", "城南区", "城北区", "高新区", "开发区", "老城区", "港区",
];
const HOTSPOT_SEED: u64 = 2029;

/// Incident density in `[0, 1]` per district and hour.
fn hotspot_matrix() -> Vec<Vec<f64>> {
    const LOAD: [f64; 8] = [0.9, 0.7, 0.6, 0.5, 0.8, 0.4, 1.0, 0.3];

    let profile = |hour: f64| {
        0.3 + 0.5 * (-(hour - 9.0).powi(2) / 8.0).exp()
            + 0.7 * (-(hour - 19.0).powi(2) / 10.0).exp()
    };

    let mut rng = fastrand::Rng::with_seed(HOTSPOT_SEED);
    let mut grid: Vec<Vec<f64>> = LOAD
        .iter()
        .map(|load| {
            (0..24)
                .map(|hour| load * profile(hour as f64) * (0.85 + 0.3 * rng.f64()))
                .collect()
        })
        .collect();

    normalize(&mut grid);
    grid
}

fn hotspot(label: &FigureLabel, family: &str) -> SvgCanvas {
    const X0: f64 = 120.0;
    const Y0: f64 = 70.0;
    const CELL_W: f64 = 36.0;
    const CELL_H: f64 = 46.0;

    let chart_w = 24.0 * CELL_W;
    let chart_h = DISTRICTS.len() as f64 * CELL_H;
    let mut c = SvgCanvas::new(1100, 540, family);
    c.text(20.0, 15.0, TITLE_SIZE, &label.caption());

    for (r, row) in hotspot_matrix().iter().enumerate() {
        for (hour, v) in row.iter().enumerate() {
            let color = heat_color(*v);
            let (x, y) = (X0 + hour as f64 * CELL_W, Y0 + r as f64 * CELL_H);
            c.filled_rect(x, y, CELL_W, CELL_H, &color);
        }
    }
    c.rect(X0, Y0, chart_w, chart_h);

    for (r, name) in DISTRICTS.iter().enumerate() {
        c.text(20.0, Y0 + r as f64 * CELL_H + 14.0, 14.0, name);
    }
    for hour in (0..24).step_by(3) {
        let x = X0 + (hour as f64 + 0.5) * CELL_W;
        c.centered_text(x, Y0 + chart_h + 6.0, 12.0, &format!("{hour:02}:00"));
    }
    c.centered_text(X0 + chart_w / 2.0, Y0 + chart_h + 30.0, 14.0, "时段 / Hour of Day");

    heat_legend(&mut c, X0 + chart_w + 20.0, Y0, 24.0, chart_h);
    c
}

fn user_roles(label: &FigureLabel, family: &str) -> SvgCanvas {
    const ROLES: [(&str, f64, f64); 5] = [
        ("呼叫者\n(Caller)", 100.0, 60.0),
        ("调度员\n(Dispatcher)", 100.0, 460.0),
        ("车辆/医护\n(Vehicle/Crew)", 860.0, 60.0),
        ("医院/急诊\n(Hospital)", 860.0, 460.0),
        ("系统管理员\n(Admin)", 500.0, 20.0),
    ];
    const ARROWS: [((f64, f64), (f64, f64)); 5] = [
        ((280.0, 120.0), (380.0, 240.0)),
        ((280.0, 480.0), (380.0, 300.0)),
        ((860.0, 120.0), (620.0, 240.0)),
        ((860.0, 480.0), (620.0, 300.0)),
        ((560.0, 100.0), (560.0, 200.0)),
    ];

    let mut c = SvgCanvas::new(1100, 600, family);
    c.rect(380.0, 200.0, 240.0, 140.0);
    c.multiline_text(390.0, 210.0, LABEL_SIZE, "急救指挥平台\n(Dispatch Platform)", 4.0);

    for (text, x, y) in ROLES {
        c.rect(x, y, 180.0, 80.0);
        c.multiline_text(x + 8.0, y + 8.0, LABEL_SIZE, text, 4.0);
    }
    for (from, to) in ARROWS {
        c.arrow(from, to, 12.0);
    }

    c.text(20.0, 570.0, TITLE_SIZE, &label.caption());
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_figures() {
        let figures = standard_figures();
        let numbers: Vec<_> = figures.iter().map(|f| f.label.number.as_str()).collect();
        assert_eq!(
            numbers,
            ["2-2", "2-3", "2-4", "2-5", "2-6", "2-7", "2-8", "2-9", "2-11"]
        );
        for figure in &figures {
            assert!(figure.label.file_name.starts_with(&format!("fig{}_", figure.label.number)));
            assert!(figure.label.file_name.ends_with(".png"));
        }
    }

    #[test]
    fn test_scenes_are_deterministic() {
        let label = FigureLabel::new("2-5", "GIS 资源热力图示意", "GIS Resource Heatmap", "a.png");
        for diagram in [Diagram::GisHeatmap, Diagram::Hotspot, Diagram::Routing] {
            let a = diagram.scene(&label, "Sans").finish();
            let b = diagram.scene(&label, "Sans").finish();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_scenes_carry_caption() {
        let label = FigureLabel::new(
            "2-7",
            "车辆调度甘特图示例",
            "Vehicle Dispatch Gantt Chart",
            "a.png",
        );
        for diagram in [
            Diagram::Architecture,
            Diagram::CallFlow,
            Diagram::TaskAllocation,
            Diagram::GisHeatmap,
            Diagram::Routing,
            Diagram::Gantt,
            Diagram::Deployment,
            Diagram::Hotspot,
            Diagram::UserRoles,
        ] {
            let svg = diagram.scene(&label, "Sans").finish();
            assert!(svg.contains("Figure 2-7: Vehicle Dispatch Gantt Chart"), "{diagram:?}");
        }
    }

    #[test]
    fn test_heat_data_is_normalized() {
        for grid in [gis_intensity(), hotspot_matrix()] {
            let max = grid.iter().flatten().copied().fold(f64::MIN, f64::max);
            assert!((max - 1.0).abs() < 1e-12);
            assert!(grid.iter().flatten().all(|v| (0.0..=1.0).contains(v)));
        }
    }
}
