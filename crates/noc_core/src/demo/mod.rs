use crate::error::AppError;
use crate::ingest::export_json::ingest_incidents_json;
use crate::ingest::IngestSummary;

const CORE_SWITCHES: [&str; 4] = ["CORE-SW-01", "CORE-SW-02", "CORE-SW-03", "CORE-SW-04"];
const WAN_FIREWALLS: [&str; 9] = [
    "ADV-FW-01",
    "ADV-FW-02",
    "FIBER-FW-01",
    "AGRO_FW-01",
    "FABRIC-FW-01",
    "AMAYA-FW-01",
    "ALUMEX-FW-01",
    "DPL-FW-01",
    "HAYCARB-FW-01",
];
const ACCESS_SWITCHES: [&str; 3] = ["ACC-SW-01", "ACC-SW-02", "DIST-SW-01"];

fn demo_json() -> String {
    // Deterministic dataset spread over Jan-Mar 2026: real outages, planned work, a month-end
    // spanning outage, an ongoing outage, a Not Down placeholder and a few malformed rows.
    let mut rows = Vec::new();
    let mut id = 0i64;
    let mut push = |category: &str, sub: &str, down: &str, up: &str, kind: &str, remarks: &str| {
        id += 1;
        rows.push(serde_json::json!({
            "id": id,
            "category": category,
            "subValue": sub,
            "downTimeDate": down,
            "upTimeDate": up,
            "downType": kind,
            "escalatedPerson": "NOC on-call",
            "remarks": remarks,
        }));
    };

    for (i, sw) in CORE_SWITCHES.iter().enumerate() {
        let day = 3 + i * 5;
        push(
            "Core Switch",
            sw,
            &format!("2026-01-{day:02}T09:00"),
            &format!("2026-01-{day:02}T{:02}:30", 9 + i),
            if i % 2 == 0 { "Unplanned" } else { "Planned" },
            if i % 2 == 0 { "-" } else { "IOS upgrade" },
        );
    }

    for (i, fw) in WAN_FIREWALLS.iter().enumerate() {
        if i % 3 == 2 {
            continue;
        }
        let day = 2 + i * 3;
        push(
            "WAN Firewall",
            fw,
            &format!("2026-02-{day:02}T14:00"),
            &format!("2026-02-{day:02}T{:02}:15", 14 + i % 4),
            "Unplanned",
            "ISP link flap",
        );
    }

    push(
        "Access & Distribution Switches",
        ACCESS_SWITCHES[0],
        "2026-01-31T22:00",
        "2026-02-01T03:00",
        "Unplanned",
        "power failure",
    );
    push(
        "Access & Distribution Switches",
        ACCESS_SWITCHES[1],
        "2026-03-20T08:00",
        "-",
        "Unplanned",
        "still down",
    );
    push(
        "Access & Distribution Switches",
        ACCESS_SWITCHES[2],
        "-",
        "-",
        "Not Down",
        "-",
    );
    push(
        "Core Switch",
        CORE_SWITCHES[0],
        "2026-03-05T12:00",
        "2026-03-05T11:00",
        "Unplanned",
        "times swapped on entry",
    );

    serde_json::Value::Array(rows).to_string()
}

/// Deterministic demo incidents, loaded through the regular JSON ingest path.
pub fn seed_demo_incidents() -> Result<IngestSummary, AppError> {
    ingest_incidents_json(&demo_json())
}
