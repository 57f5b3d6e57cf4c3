//! Shared fixtures for unit tests

use biospace_common::{CorpusSnapshot, Document};

/// Mouse RNA-Seq document with the given mission and entity labels
pub fn doc(id: &str, mission: &str, entities: &[&str]) -> Document {
    Document {
        id: id.to_string(),
        title: format!("Study {}", id),
        source: "OSDR".to_string(),
        year: Some(2021),
        organism: "Mus musculus".to_string(),
        mission: mission.to_string(),
        assay_type: "RNA-Seq".to_string(),
        sample_size: Some(12),
        snippet: String::new(),
        entities: entities.iter().map(|e| e.to_string()).collect(),
        url: format!("https://example.org/{}", id),
        evidence: Vec::new(),
        doi: None,
    }
}

fn full(
    id: &str,
    title: &str,
    source: &str,
    organism: &str,
    mission: &str,
    assay_type: &str,
    snippet: &str,
    entities: &[&str],
) -> Document {
    Document {
        id: id.to_string(),
        title: title.to_string(),
        source: source.to_string(),
        year: Some(2019),
        organism: organism.to_string(),
        mission: mission.to_string(),
        assay_type: assay_type.to_string(),
        sample_size: Some(8),
        snippet: snippet.to_string(),
        entities: entities.iter().map(|e| e.to_string()).collect(),
        url: format!("https://example.org/{}", id),
        evidence: vec![format!("{} Reported in the results section.", snippet)],
        doi: Some(format!("10.0000/{}", id)),
    }
}

/// Small mixed corpus: rodent bone/muscle work and plant root work
pub fn sample_documents() -> Vec<Document> {
    vec![
        full(
            "osd-48",
            "Femoral bone loss in mice after 37 days in orbit",
            "OSDR",
            "Mus musculus",
            "RR-1",
            "microCT",
            "Trabecular volume fraction dropped in flight animals.",
            &["bone loss", "microgravity"],
        ),
        full(
            "osd-99",
            "Skeletal muscle transcriptome of spaceflown mice",
            "OSDR",
            "Mus musculus",
            "RR-1",
            "RNA-Seq",
            "Atrophy-related genes were upregulated in the soleus.",
            &["muscle atrophy", "Microgravity"],
        ),
        full(
            "pmc-7321",
            "Hindlimb unloading and bone remodeling",
            "PubMed Central",
            "Rattus norvegicus",
            "Ground analog",
            "Histology",
            "Osteoclast counts rose during unloading.",
            &["bone remodeling", "hindlimb unloading"],
        ),
        full(
            "osd-120",
            "Root skewing of Arabidopsis on the ISS",
            "OSDR",
            "Arabidopsis thaliana",
            "BRIC-19",
            "Microarray",
            "Roots skewed without a gravity vector.",
            &["root growth", "gravitropism"],
        ),
        full(
            "osd-37",
            "Arabidopsis seedling transcript changes in flight",
            "OSDR",
            "Arabidopsis thaliana",
            "APEX-03",
            "RNA-Seq",
            "Cell wall remodeling transcripts were altered in seedlings.",
            &["cell wall", "spaceflight"],
        ),
        full(
            "ntrs-2020",
            "Deep space radiation exposure in mouse brain",
            "NASA Technical Reports",
            "Mus musculus",
            "NSRL-19A",
            "Behavioral assay",
            "Simulated galactic cosmic rays impaired memory tasks.",
            &["radiation", "cognition"],
        ),
    ]
}

pub fn sample_snapshot() -> CorpusSnapshot {
    CorpusSnapshot::new(1, sample_documents()).expect("sample corpus is valid")
}
