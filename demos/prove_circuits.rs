use std::{env, fs};

use serde_json::json;
use tbcs_snark::{
    Circuit, CircuitDescription, ExportedProof, ExportedVerifyingKey, HarnessConfig, OutputPolicy,
    ProofPipeline,
    backend::Groth16Backend,
    circuits::{divisible_by_three, prime_under_sixteen},
    harness::{Harness, HarnessReport},
};

fn report_json(name: &str, circuit: &Circuit, report: &HarnessReport) -> serde_json::Value {
    json!({
        "circuit": name,
        "primary_input_size": circuit.primary_input_size,
        "auxiliary_input_size": circuit.auxiliary_input_size,
        "gates": circuit.num_gates(),
        "trials": report.results.len(),
        "accepted": report.accepted().map(|c| c.index).collect::<Vec<_>>(),
        "complete": report.is_complete(),
        "sound": report.is_sound(),
        "findings": report.findings(),
        "failures": report.failures.iter().map(|f| f.index).collect::<Vec<_>>(),
    })
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let json_output = args.contains(&"--json".to_string());
    let custom = args
        .iter()
        .position(|arg| arg == "--circuit")
        .and_then(|i| args.get(i + 1));

    let mut circuits = vec![
        ("divisible_by_three", divisible_by_three()),
        ("prime_under_sixteen", prime_under_sixteen()),
    ];
    if let Some(path) = custom {
        let text = fs::read_to_string(path).unwrap();
        let description: CircuitDescription = serde_json::from_str(&text).unwrap();
        circuits.push((
            path.as_str(),
            Circuit::from_description(&description, OutputPolicy::Warn).unwrap(),
        ));
    }

    let pipeline = ProofPipeline::new(Groth16Backend::new()).with_policy(OutputPolicy::Warn);
    let harness = Harness::new(&pipeline, HarnessConfig::default());
    let mut summary = Vec::new();

    for (name, circuit) in &circuits {
        if !json_output {
            println!("=== {name} ===");
            println!("{circuit}");
        }

        let keypair = pipeline.setup(circuit).unwrap();
        let report = harness.run_exhaustive(circuit, &keypair).unwrap();

        if json_output {
            summary.push(report_json(name, circuit, &report));
            continue;
        }
        println!("{report}");

        if let Some(witness) = report.accepted().next() {
            let proof = pipeline
                .prove(&keypair.proving_key, &witness.primary, &witness.auxiliary)
                .unwrap();
            println!("\nverifying key:");
            print!("{}", ExportedVerifyingKey::from(&keypair.verifying_key));
            println!("proof for {witness}:");
            print!("{}", ExportedProof::from(&proof));
        }
        println!();
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary).unwrap());
    }
}
