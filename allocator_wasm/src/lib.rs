use allocator_core::{plan, Scenario};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn allocate_from_json(scenario_json: &str) -> String {
    // 1) Deserialize input from JSON → Scenario
    let scenario: Scenario = match serde_json::from_str(scenario_json) {
        Ok(s) => s,
        Err(e) => {
            return format!("Error parsing JSON: {}", e);
        }
    };

    // 2) Build, solve and project through allocator_core
    match plan(&scenario.demand, &scenario.policy, scenario.mode) {
        Ok(report) => {
            // Convert the report into JSON for the JS side
            match serde_json::to_string(&report) {
                Ok(json) => json,
                Err(e) => format!("Error serializing report: {}", e),
            }
        }
        Err(err) => format!("Infeasible or error: {}", err),
    }
}
