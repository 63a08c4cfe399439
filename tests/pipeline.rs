use nlrexpress::cli::{AnnotateArgs, PredictArgs};
use nlrexpress::commands::{annotate::annotate, predict::predict};
use nlrexpress::nlr::{
    read_hits,
    writers::{DOMAINS_FILE_NAME, HITS_FILE_NAME},
};
use std::fs;
use std::path::{Path, PathBuf};

const CATALOG: &str = "\
# name family left right span model
walker NBARC 1 1 1 walker.json
quiet CC 1 1 1 quiet.json
";

/// Single-layer model over `inputs` zero weights, so every window scores
/// `sigmoid(intercept)`.
fn write_model(path: &Path, inputs: usize, intercept: f64) {
    let coefs = vec![vec![0.0]; inputs];
    let json = format!(
        r#"{{"activation": "identity", "out_activation": "logistic", "coefs": [{}], "intercepts": [[{}]]}}"#,
        serde_json::to_string(&coefs).unwrap(),
        intercept
    );
    fs::write(path, json).unwrap();
}

fn render_profile(name: &str, length: usize) -> String {
    let emissions = |offset: f64| {
        (0..20)
            .map(|j| format!("{:.5}", offset + j as f64 / 100.0))
            .collect::<Vec<_>>()
            .join(" ")
    };
    let mut out = String::new();
    out.push_str("HMMER3/f [3.3.2 | Nov 2020]\n");
    out.push_str(&format!("NAME  {}\n", name));
    out.push_str(&format!("LENG  {}\n", length));
    out.push_str("ALPH  amino\n");
    out.push_str("HMM          A        C        D   (...)\n");
    out.push_str("            m->m     m->i     m->d     i->m     i->i     d->m     d->d\n");
    out.push_str(&format!("  COMPO   {}\n", emissions(3.0)));
    out.push_str(&format!("          {}\n", emissions(3.0)));
    out.push_str("          0.01 4.61 5.30 0.61 0.78 0.00 *\n");
    for k in 1..=length {
        out.push_str(&format!("      {} {} {} - - -\n", k, emissions(k as f64), k));
        out.push_str(&format!("          {}\n", emissions(2.0)));
        out.push_str("          0.01 4.61 5.30 0.61 0.78 0.48 0.95\n");
    }
    out.push_str("//\n");
    out
}

struct Fixture {
    _dir: tempfile::TempDir,
    input: PathBuf,
    output_dir: PathBuf,
    models_dir: PathBuf,
    catalog: PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("proteins.fasta");
    fs::write(&input, ">p1 first\nMKVLAA\n>p2\nMKV\n").unwrap();

    let catalog = dir.path().join("catalog.txt");
    fs::write(&catalog, CATALOG).unwrap();

    // Four residues per window, forty features per residue
    let models_dir = dir.path().join("models");
    fs::create_dir(&models_dir).unwrap();
    write_model(&models_dir.join("walker.json"), 160, 3.0);
    write_model(&models_dir.join("quiet.json"), 160, -3.0);

    let output_dir = dir.path().join("out");
    fs::create_dir(&output_dir).unwrap();
    fs::write(
        output_dir.join("proteins-1.hmm"),
        format!("{}{}", render_profile("p1-i1", 6), render_profile("p2-i1", 3)),
    )
    .unwrap();

    Fixture {
        _dir: dir,
        input,
        output_dir,
        models_dir,
        catalog,
    }
}

fn predict_args(fx: &Fixture) -> PredictArgs {
    PredictArgs {
        input: fx.input.clone(),
        output_dir: fx.output_dir.clone(),
        num_threads: 2,
        database: PathBuf::from("/no/such/db.fasta"),
        models_dir: fx.models_dir.clone(),
        cutoff: 0.2,
        annotate: true,
        domain_threshold: 0.8,
        catalog: Some(fx.catalog.clone()),
        jackhmmer: PathBuf::from("jackhmmer"),
        search_timeout: None,
        reuse_profiles: true,
    }
}

#[test]
fn test_predict_with_existing_profiles() {
    let fx = fixture();
    predict(predict_args(&fx)).unwrap();

    let hits = read_hits(&fx.output_dir.join(HITS_FILE_NAME)).unwrap();
    let located: Vec<_> = hits
        .iter()
        .map(|h| (h.protein.as_str(), h.res_id, h.motif.as_str()))
        .collect();
    assert_eq!(
        located,
        vec![("p1", 2, "walker"), ("p1", 3, "walker"), ("p1", 4, "walker")]
    );
    let expected = 1.0 / (1.0 + (-3.0f64).exp());
    assert!(hits.iter().all(|h| (h.probability - expected).abs() < 1e-9));
    assert_eq!(hits[0].left_context, "M");
    assert_eq!(hits[0].motif_seq, "K");
    assert_eq!(hits[0].right_context, "VLAA");

    assert_eq!(
        fs::read_to_string(fx.output_dir.join(DOMAINS_FILE_NAME)).unwrap(),
        "protein\tdomains\np1\tNBARC\n"
    );
    assert!(!fx.output_dir.join("proteins.fasta_proc").exists());
}

#[test]
fn test_annotate_predicted_hits() {
    let fx = fixture();
    let mut args = predict_args(&fx);
    args.annotate = false;
    predict(args).unwrap();
    assert!(!fx.output_dir.join(DOMAINS_FILE_NAME).exists());

    let annotated = fx.output_dir.join("annotated");
    annotate(AnnotateArgs {
        input: fx.output_dir.join(HITS_FILE_NAME),
        output_dir: annotated.clone(),
        domain_threshold: 0.99,
        catalog: Some(fx.catalog.clone()),
        fail_fast: false,
    })
    .unwrap();
    assert_eq!(
        fs::read_to_string(annotated.join(DOMAINS_FILE_NAME)).unwrap(),
        "protein\tdomains\np1\t\n"
    );
}

#[test]
fn test_missing_model_fails_before_search() {
    let fx = fixture();
    fs::remove_file(fx.models_dir.join("quiet.json")).unwrap();
    let mut args = predict_args(&fx);
    args.reuse_profiles = false;
    let err = predict(args).unwrap_err();
    assert!(err.is_not_found());
    assert!(!fx.output_dir.join(HITS_FILE_NAME).exists());
}
