use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Target container for a classification file card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Video,
    Image,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCard {
    pub id: String,
    pub name: String,
    pub bucket: Bucket,
}

/// The four puzzle kinds. Each carries its content and knows how to compare
/// a submitted [`Answer`] against the stored solution; everything else about
/// a challenge (states, timing, emission) lives in the shared session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum ChallengeKind {
    /// Decode an alphabet-position cipher into a word.
    Decryption { code: String, solution: String },
    /// Arrange the fueling steps into the correct order.
    Coding { steps: Vec<Step>, order: Vec<u32> },
    /// Connect the communication nodes with the required links.
    Graph {
        nodes: Vec<GraphNode>,
        links: Vec<(u32, u32)>,
    },
    /// Sort every file card into its correct bucket.
    Ds { files: Vec<FileCard> },
}

/// A player's submitted arrangement, one shape per puzzle kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Text(String),
    Order(Vec<u32>),
    Links(Vec<(u32, u32)>),
    Buckets(HashMap<String, Bucket>),
}

fn undirected(edge: &(u32, u32)) -> (u32, u32) {
    let (a, b) = *edge;
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl ChallengeKind {
    /// Compare a submission against the stored solution. A submission of the
    /// wrong shape for this kind never matches.
    pub fn check(&self, answer: &Answer) -> bool {
        match (self, answer) {
            (ChallengeKind::Decryption { solution, .. }, Answer::Text(text)) => {
                text.trim().eq_ignore_ascii_case(solution)
            }
            (ChallengeKind::Coding { order, .. }, Answer::Order(submitted)) => submitted == order,
            (ChallengeKind::Graph { links, .. }, Answer::Links(submitted)) => {
                // Direction-agnostic: (a, b) and (b, a) are the same link.
                if submitted.len() != links.len() {
                    return false;
                }
                let drawn: HashSet<(u32, u32)> = submitted.iter().map(undirected).collect();
                links.iter().map(undirected).all(|link| drawn.contains(&link))
            }
            (ChallengeKind::Ds { files }, Answer::Buckets(assigned)) => {
                assigned.len() == files.len()
                    && files
                        .iter()
                        .all(|file| assigned.get(&file.id) == Some(&file.bucket))
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rocket {
    pub id: u32,
    #[serde(flatten)]
    pub kind: ChallengeKind,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RocketCatalog {
    rockets: Vec<Rocket>,
}

impl RocketCatalog {
    pub fn new() -> Self {
        RocketCatalog {
            rockets: Vec::new(),
        }
    }

    pub fn add_rocket(&mut self, rocket: Rocket) {
        if self.rockets.iter().any(|r| r.id == rocket.id) {
            return;
        }
        self.rockets.push(rocket);
    }

    pub fn get_rocket(&self, id: u32) -> Option<&Rocket> {
        self.rockets.iter().find(|rocket| rocket.id == id)
    }

    pub fn rockets(&self) -> &[Rocket] {
        &self.rockets
    }

    /// The mixed mission from the original game: one rocket per puzzle kind.
    pub fn default_mission() -> Self {
        let mut catalog = RocketCatalog::new();
        catalog.add_rocket(Rocket {
            id: 1,
            kind: ChallengeKind::Decryption {
                code: "15 08 13 10".to_string(),
                solution: "pink".to_string(),
            },
        });
        catalog.add_rocket(Rocket {
            id: 2,
            kind: ChallengeKind::Coding {
                steps: vec![
                    Step {
                        id: 2,
                        text: "Check fuel tank".to_string(),
                    },
                    Step {
                        id: 1,
                        text: "Connect fuel hose".to_string(),
                    },
                    Step {
                        id: 4,
                        text: "Start pumping fuel".to_string(),
                    },
                    Step {
                        id: 3,
                        text: "Monitor fuel".to_string(),
                    },
                ],
                order: vec![2, 1, 4, 3],
            },
        });
        catalog.add_rocket(Rocket {
            id: 3,
            kind: ChallengeKind::Graph {
                nodes: vec![
                    GraphNode {
                        id: 1,
                        name: "Mars".to_string(),
                    },
                    GraphNode {
                        id: 2,
                        name: "Mars Satellite".to_string(),
                    },
                    GraphNode {
                        id: 3,
                        name: "Earth Satellite".to_string(),
                    },
                    GraphNode {
                        id: 4,
                        name: "Earth".to_string(),
                    },
                ],
                links: vec![(1, 2), (2, 3), (3, 4)],
            },
        });
        catalog.add_rocket(Rocket {
            id: 4,
            kind: ChallengeKind::Ds {
                files: vec![
                    FileCard {
                        id: "1".to_string(),
                        name: "Document.txt".to_string(),
                        bucket: Bucket::Text,
                    },
                    FileCard {
                        id: "2".to_string(),
                        name: "Image.jpg".to_string(),
                        bucket: Bucket::Image,
                    },
                    FileCard {
                        id: "3".to_string(),
                        name: "Video.mp4".to_string(),
                        bucket: Bucket::Video,
                    },
                    FileCard {
                        id: "5".to_string(),
                        name: "Screenshot.png".to_string(),
                        bucket: Bucket::Image,
                    },
                ],
            },
        });
        catalog
    }

    /// The all-cipher mission: four color codes, one per rocket.
    pub fn decryption_mission() -> Self {
        let codes = [
            (1, "15 08 13 10", "pink"),
            (2, "01 11 20 04", "blue"),
            (3, "06 17 04 04 13", "green"),
            (4, "21 08 14 11 04 19", "violet"),
        ];

        let mut catalog = RocketCatalog::new();
        for (id, code, solution) in codes {
            catalog.add_rocket(Rocket {
                id,
                kind: ChallengeKind::Decryption {
                    code: code.to_string(),
                    solution: solution.to_string(),
                },
            });
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ds_files() -> Vec<FileCard> {
        match RocketCatalog::default_mission()
            .get_rocket(4)
            .unwrap()
            .kind
            .clone()
        {
            ChallengeKind::Ds { files } => files,
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn decryption_is_case_insensitive() {
        let kind = ChallengeKind::Decryption {
            code: "15 08 13 10".to_string(),
            solution: "pink".to_string(),
        };

        assert!(kind.check(&Answer::Text("pink".to_string())));
        assert!(kind.check(&Answer::Text("  PINK ".to_string())));
        assert!(!kind.check(&Answer::Text("blue".to_string())));
    }

    #[test]
    fn coding_requires_exact_order() {
        let catalog = RocketCatalog::default_mission();
        let kind = &catalog.get_rocket(2).unwrap().kind;

        assert!(kind.check(&Answer::Order(vec![2, 1, 4, 3])));
        assert!(!kind.check(&Answer::Order(vec![1, 2, 4, 3])));
        assert!(!kind.check(&Answer::Order(vec![2, 1, 4])));
    }

    #[test]
    fn graph_links_are_direction_agnostic() {
        let catalog = RocketCatalog::default_mission();
        let kind = &catalog.get_rocket(3).unwrap().kind;

        assert!(kind.check(&Answer::Links(vec![(2, 1), (3, 2), (3, 4)])));
        assert!(!kind.check(&Answer::Links(vec![(1, 2), (2, 3)])));
        assert!(!kind.check(&Answer::Links(vec![(1, 2), (2, 3), (1, 4)])));
    }

    #[test]
    fn ds_all_correct_buckets_match() {
        let kind = ChallengeKind::Ds { files: ds_files() };

        let assigned: HashMap<String, Bucket> = ds_files()
            .into_iter()
            .map(|file| (file.id, file.bucket))
            .collect();
        assert!(kind.check(&Answer::Buckets(assigned)));
    }

    #[test]
    fn ds_one_wrong_bucket_fails() {
        let kind = ChallengeKind::Ds { files: ds_files() };

        let mut assigned: HashMap<String, Bucket> = ds_files()
            .into_iter()
            .map(|file| (file.id, file.bucket))
            .collect();
        assigned.insert("1".to_string(), Bucket::Video);
        assert!(!kind.check(&Answer::Buckets(assigned)));
    }

    #[test]
    fn ds_unassigned_file_fails() {
        let kind = ChallengeKind::Ds { files: ds_files() };
        assert!(!kind.check(&Answer::Buckets(HashMap::new())));
    }

    #[test]
    fn wrong_answer_shape_never_matches() {
        let kind = ChallengeKind::Decryption {
            code: "01 11 20 04".to_string(),
            solution: "blue".to_string(),
        };
        assert!(!kind.check(&Answer::Order(vec![1, 2, 3])));
    }

    #[test]
    fn catalog_deduplicates_by_id() {
        let mut catalog = RocketCatalog::new();
        let rocket = Rocket {
            id: 1,
            kind: ChallengeKind::Decryption {
                code: "15 08 13 10".to_string(),
                solution: "pink".to_string(),
            },
        };

        catalog.add_rocket(rocket.clone());
        catalog.add_rocket(rocket);
        assert_eq!(catalog.rockets().len(), 1);
    }

    #[test]
    fn rocket_wire_shape_matches_original() {
        let rocket = Rocket {
            id: 1,
            kind: ChallengeKind::Decryption {
                code: "15 08 13 10".to_string(),
                solution: "pink".to_string(),
            },
        };

        let serialized = serde_json::to_value(&rocket).unwrap();
        assert_eq!(
            serialized,
            serde_json::json!({
                "id": 1,
                "type": "decryption",
                "content": { "code": "15 08 13 10", "solution": "pink" }
            })
        );
    }
}
