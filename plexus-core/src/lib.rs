//! Plexus core library.
//!
//! A concurrent graph engine: a slot-arena adjacency store, Barabási–Albert
//! and Watts–Strogatz generators, parallel structural measures, Monte-Carlo
//! occupation centrality, similarity-based link prediction and multilayer
//! aggregation.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod generate;
mod influence;
mod multilayer;
mod node;
mod progress;
mod rng;
mod similarity;
mod store;
mod walk;

pub mod measures;
pub mod predict;

#[cfg(test)]
mod test_utils;

pub use crate::{
    error::{
        GeneratorError, GeneratorErrorCode, InfluenceError, InfluenceErrorCode, MeasureError,
        MeasureErrorCode, WalkError, WalkErrorCode,
    },
    generate::{
        BarabasiAlbert, MAX_GENERATOR_SIZE, MAX_LATTICE_DEGREE, PHASE_ATTACHING,
        PHASE_BARABASI_ALBERT_DONE, PHASE_LATTICE, PHASE_REWIRING, PHASE_WATTS_STROGATZ_DONE,
        WattsStrogatz,
    },
    influence::{
        CandidateCriteria, Cascade, cascade_from_candidates, independent_cascade,
        select_seed_candidates,
    },
    multilayer::{ActorAverages, LayerSummary, MultilayerGraph},
    node::{LayerId, NodeId},
    predict::{ConfusionMatrix, LinkPrediction, Ratio, SimilarityMatrix},
    progress::{ChannelProgress, NoProgress, ProgressCell, ProgressEvent, ProgressSink},
    similarity::{
        AdamicAdar, CommonNeighbours, Cosine, Jaccard, PreferentialAttachment,
        ResourceAllocation, Similarity, SimilarityKind, Sorensen, UnknownSimilarity,
        common_neighbours,
    },
    store::{EdgeOutcome, GraphConfig, GraphStore, SymmetryViolation},
    walk::{WalkParams, average_occupation_centrality, occupation_centrality},
};
