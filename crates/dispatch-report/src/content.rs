//! Narrative text of the report.

use chrono::NaiveDate;

/// The document title.
pub const REPORT_TITLE: &str = "城市级急救指挥平台：需求分析与系统设计";
/// Heading of the requirements chapter.
pub const REQUIREMENTS_HEADING: &str = "需求分析（扩展）";
/// Heading of the user-analysis chapter.
pub const USER_ANALYSIS_HEADING: &str = "用户分析";
/// Heading of the figure chapter.
pub const FIGURES_HEADING: &str = "图示与说明";

/// The line under the title.
pub fn byline(author: &str, date: NaiveDate) -> String {
    format!("作者：{author}    日期：{}", date.format("%Y-%m-%d"))
}

/// Paragraphs of the requirements chapter, in document order.
pub const REQUIREMENTS: &[&str] = &[
    "本章从业务流程、功能需求与非功能需求三个层面，对城市级急救指挥平台进行分析。\
     平台以“快速受理、精准定位、最优派车、全程可视”为目标，覆盖从呼叫接入到患者送达医院的完整闭环。",
    "1. 业务流程概述",
    "急救业务可划分为呼叫受理、事件生成、任务分配、途中调度、院前交接与事后分析六个阶段。\
     各阶段之间通过事件单进行衔接，事件单在生命周期内记录时间戳、位置、病情等级、所派车辆与处置结果。",
    "2. 功能需求",
    "（1）呼叫受理：支持多线路并发接入，自动进行语音识别（ASR）与语义解析（NLP），\
     抽取地址、主诉症状与联系人信息；地址无法确定时提示调度员回拨核实。",
    "（2）事件生成：依据主诉症状与分级规则自动给出病情等级，生成结构化事件单并进入待分配队列；\
     支持同一地点重复来电的合并与关联。",
    "（3）调度引擎：以混合整数规划（MIP）模型为核心，在车辆可用性、时间窗与医院能力约束下求解派车方案；\
     在突发大规模事件时可切换为基于强化学习（RL）的快速启发式策略。",
    "（4）GIS 与路径规划：提供车辆、站点与医院的实时地图视图，结合路况数据计算 ETA，\
     在拥堵或道路封闭时自动重规划路径并推送至车载终端。",
    "（5）监控看板：实时展示在途任务、车辆状态、平均响应时间等指标，超时任务高亮告警。",
    "（6）医院接口：与医院信息系统（HIS）对接，推送患者摘要与预计到院时间，接收床位与接收确认反馈。",
    "（7）历史分析：对历史事件进行时空热点分析，为站点布局与排班优化提供依据。",
    "3. 非功能需求",
    "（1）性能：呼叫受理到事件生成的平均耗时不超过 60 秒；调度求解在 5 秒内给出可行方案。",
    "（2）可用性：核心服务双活部署，年可用性不低于 99.95%，单节点故障不影响受理业务。",
    "（3）安全与合规：全链路加密传输，敏感字段脱敏存储，所有人工覆写与权限变更均记录审计日志。",
    "（4）可扩展性：调度模型、分级规则与地图服务以插件形式接入，便于按城市规模扩展。",
];

/// Paragraphs of the user-analysis chapter, in document order.
pub const USER_ANALYSIS: &[&str] = &[
    "本节对系统的主要用户群体进行分析，明确各类用户的需求、优先任务和操作范畴，\
     以便在系统功能设计、权限控制与 UI 流程上做出合理划分。",
    "1. 用户分类与描述",
    "（1）呼叫者（公众）: 通常为非专业人员，在突发事件中发起急救呼叫。\
     其核心需求是快速接入、地址被正确识别以及收到车辆到达的实时反馈；界面简洁、交互引导性强是必要条件。",
    "（2）调度员 / 指挥人员: 系统的主控用户，负责核验自动判定结果、执行或覆写自动分配。\
     其需求包括高并发下的快速决策支持、直观的地图与资源视图、易于人工干预的流程以及详细的审计日志。",
    "（3）车辆驾驶员 / 医护: 移动端使用者，需求为任务接收、路径指引、任务状态上报与通讯稳定性。\
     车辆端需简洁显示 ETA 与任务优先级。",
    "（4）医院接收方（急诊协调）: 需收到患者信息、预计到院时间与病情摘要，支持接收/拒绝与床位反馈接口。",
    "（5）系统管理员与运维: 负责权限管理、规则配置、数据备份与故障处理，关注系统安全性与可用性指标。",
    "2. 主要需求与关键痛点",
    "（1）呼叫者层面：地址不确定性、表达不清、紧张导致描述不完整，系统需通过 ASR+NLP 做容错解析并提供人工核实流程；\
     同时在位置模糊时应提供快速回拨或短信确认机制。",
    "（2）调度员层面：自动分配需保证高可行性且提供决策可解释性（为什么选该车），\
     在突发资源紧张时需支持快速筛选与跨区调用。",
    "（3）车辆端：移动网络波动、GPS 偏差以及司机信息接收延迟是主要问题，需支持离线缓存与断点上传机制。",
    "3. 用户行为与优先级矩阵",
    "为便于系统设计，可将用户与操作按优先级矩阵进行刻画，例如：调度员对任务分配具有最高写权限，可覆写自动策略；\
     车辆端主要为接收与回传；医院有条件性写权限（接收确认、床位状态）。",
    "4. 权限与合规考虑",
    "对用户数据访问实施细粒度权限控制：调度员按角色分层，医院按机构权限访问病历相关字段；所有敏感操作均需审计日志，\
     并在传输/存储中对个人识别信息进行加密或脱敏处理以满足合规要求。",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byline() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(byline("系统设计组", date), "作者：系统设计组    日期：2024-03-07");
    }

    #[test]
    fn test_paragraphs_are_trimmed() {
        for text in REQUIREMENTS.iter().chain(USER_ANALYSIS) {
            assert!(!text.is_empty());
            assert_eq!(text.trim(), *text);
        }
    }
}
