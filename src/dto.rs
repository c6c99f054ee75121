//! DTOs for REST API requests/responses.
//!
//! Request fields are all optional so that a missing field becomes a
//! descriptive `InvalidInput` rather than a generic parse failure. Each
//! request's `into_domain` performs the boundary validation and yields the
//! typed values the solvers accept.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::config::SolverLimits;
use crate::domain::{AdjacencyList, AdjacencyMatrix, City, Item, NodeId};
use crate::error::{Result, SolverError};
use crate::solvers::bin_packing::Bin;
use crate::solvers::graph_coloring::ColorAssignment;
use crate::solvers::hamiltonian::HamiltonianOutcome;
use crate::solvers::knapsack::KnapsackSolution;
use crate::solvers::tsp::Tour;

/// Message returned when the Hamiltonian search comes up empty.
pub const NO_CYCLE_MESSAGE: &str = "No Hamiltonian cycle found";

// ============================================================================
// TSP
// ============================================================================

/// Traveling salesman request.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TspRequest {
    /// City coordinates, e.g. `[[0, 0], [3, 4]]`.
    pub cities: Option<Vec<Vec<f64>>>,
}

impl TspRequest {
    pub fn into_domain(self, limits: &SolverLimits) -> Result<Vec<City>> {
        let cities = self
            .cities
            .filter(|c| !c.is_empty())
            .ok_or_else(|| SolverError::missing("cities"))?;

        if cities.len() > limits.tsp_max_cities {
            return Err(SolverError::invalid(format!(
                "Too many cities: {} (at most {} are supported)",
                cities.len(),
                limits.tsp_max_cities
            )));
        }

        let dimension = cities[0].len();
        if dimension == 0 {
            return Err(SolverError::invalid("City coordinates must not be empty"));
        }
        for (i, coordinates) in cities.iter().enumerate() {
            if coordinates.len() != dimension {
                return Err(SolverError::invalid(format!(
                    "City {} has {} coordinates, expected {}",
                    i,
                    coordinates.len(),
                    dimension
                )));
            }
            if coordinates.iter().any(|c| !c.is_finite()) {
                return Err(SolverError::invalid(format!(
                    "City {} has a non-finite coordinate",
                    i
                )));
            }
        }

        Ok(cities.into_iter().map(City::new).collect())
    }
}

/// Traveling salesman response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TspResponse {
    /// City indices in visiting order.
    pub best_route: Vec<usize>,
    /// Closed-tour length including the return to the first city.
    pub total_distance: f64,
}

impl From<Tour> for TspResponse {
    fn from(tour: Tour) -> Self {
        Self {
            best_route: tour.route,
            total_distance: tour.length,
        }
    }
}

// ============================================================================
// Knapsack
// ============================================================================

/// One knapsack item as sent by the client.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct ItemDto {
    pub weight: i64,
    pub value: i64,
}

/// Knapsack request.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct KnapsackRequest {
    pub items: Option<Vec<ItemDto>>,
    /// Knapsack capacity. Zero is valid.
    pub capacity: Option<i64>,
}

impl KnapsackRequest {
    pub fn into_domain(self, limits: &SolverLimits) -> Result<(Vec<Item>, usize)> {
        let items = self.items.ok_or_else(|| SolverError::missing("items"))?;
        let capacity = self.capacity.ok_or_else(|| SolverError::missing("capacity"))?;

        let capacity = u64::try_from(capacity)
            .map_err(|_| SolverError::invalid(format!("Capacity must be non-negative, got {}", capacity)))?;
        if capacity > limits.knapsack_max_capacity {
            return Err(SolverError::invalid(format!(
                "Capacity {} exceeds the limit of {}",
                capacity, limits.knapsack_max_capacity
            )));
        }
        let cells = (items.len() as u64)
            .checked_add(1)
            .zip(capacity.checked_add(1))
            .and_then(|(rows, columns)| rows.checked_mul(columns))
            .filter(|cells| *cells <= limits.knapsack_max_cells);
        if cells.is_none() {
            return Err(SolverError::invalid(format!(
                "Instance too large: {} items with capacity {} exceeds {} table cells",
                items.len(),
                capacity,
                limits.knapsack_max_cells
            )));
        }
        let capacity = usize::try_from(capacity)
            .map_err(|_| SolverError::invalid(format!("Capacity {} is too large", capacity)))?;

        let items = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                match (u64::try_from(item.weight), u64::try_from(item.value)) {
                    (Ok(weight), Ok(value)) => Ok(Item::new(weight, value)),
                    _ => Err(SolverError::invalid(format!(
                        "Item {} must have non-negative weight and value",
                        i
                    ))),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((items, capacity))
    }
}

/// Knapsack response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct KnapsackResponse {
    pub max_value: u64,
    /// Indices of the items in one optimal packing.
    pub selected_items: Vec<usize>,
}

impl From<KnapsackSolution> for KnapsackResponse {
    fn from(solution: KnapsackSolution) -> Self {
        Self {
            max_value: solution.max_value,
            selected_items: solution.selected,
        }
    }
}

// ============================================================================
// Graph coloring
// ============================================================================

/// A neighbor id, sent either as a JSON integer or as a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NodeRef {
    Id(NodeId),
    Name(String),
}

impl NodeRef {
    fn to_node_id(&self) -> Result<NodeId> {
        match self {
            NodeRef::Id(id) => Ok(*id),
            NodeRef::Name(name) => parse_node_id(name),
        }
    }
}

fn parse_node_id(text: &str) -> Result<NodeId> {
    text.trim().parse::<NodeId>().map_err(|_| {
        SolverError::invalid(format!(
            "Node ids must be non-negative integers, got {:?}",
            text
        ))
    })
}

/// A JSON object of node id to neighbor ids, kept in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeMapDto(pub Vec<(String, Vec<NodeRef>)>);

impl<'de> Deserialize<'de> for NodeMapDto {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct NodeMapVisitor;

        impl<'de> Visitor<'de> for NodeMapVisitor {
            type Value = NodeMapDto;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping node ids to neighbor lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Vec<NodeRef>>()? {
                    entries.push(entry);
                }
                Ok(NodeMapDto(entries))
            }
        }

        deserializer.deserialize_map(NodeMapVisitor)
    }
}

/// Graph coloring request.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct GraphColoringRequest {
    /// Node id to neighbor ids, e.g. `{"0": [1, 2], "1": [0], "2": [0]}`.
    #[schema(value_type = Object)]
    pub graph: Option<NodeMapDto>,
}

impl GraphColoringRequest {
    pub fn into_domain(self) -> Result<AdjacencyList> {
        let NodeMapDto(entries) = self
            .graph
            .filter(|g| !g.0.is_empty())
            .ok_or_else(|| SolverError::missing("graph"))?;

        entries
            .into_iter()
            .map(|(key, neighbors)| -> Result<(NodeId, Vec<NodeId>)> {
                let node = parse_node_id(&key)?;
                let neighbors = neighbors
                    .iter()
                    .map(NodeRef::to_node_id)
                    .collect::<Result<Vec<_>>>()?;
                Ok((node, neighbors))
            })
            .collect()
    }
}

/// Graph coloring response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GraphColoringResponse {
    /// Node id to color, in processing order.
    #[schema(value_type = Object)]
    pub color_assignment: ColorAssignment,
}

// ============================================================================
// Hamiltonian cycle
// ============================================================================

/// Hamiltonian cycle request.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct HamiltonianCycleRequest {
    /// Square 0/1 adjacency matrix; `graph[i][j] == 1` is an edge `i -> j`.
    pub graph: Option<Vec<Vec<u8>>>,
}

impl HamiltonianCycleRequest {
    pub fn into_domain(self, limits: &SolverLimits) -> Result<AdjacencyMatrix> {
        let rows = self.graph.ok_or_else(|| SolverError::missing("graph"))?;
        if rows.len() > limits.hamiltonian_max_nodes {
            return Err(SolverError::invalid(format!(
                "Too many nodes: {} (at most {} are supported)",
                rows.len(),
                limits.hamiltonian_max_nodes
            )));
        }
        AdjacencyMatrix::from_rows(&rows)
    }
}

/// Hamiltonian cycle response: either `cycle` or `message` is present.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HamiltonianCycleResponse {
    /// Nodes in visiting order, starting and ending at node 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle: Option<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<HamiltonianOutcome> for HamiltonianCycleResponse {
    fn from(outcome: HamiltonianOutcome) -> Self {
        match outcome {
            HamiltonianOutcome::Cycle(cycle) => Self {
                cycle: Some(cycle),
                message: None,
            },
            HamiltonianOutcome::NoCycle => Self {
                cycle: None,
                message: Some(NO_CYCLE_MESSAGE.to_string()),
            },
        }
    }
}

// ============================================================================
// Bin packing
// ============================================================================

/// Bin packing request.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BinPackingRequest {
    /// Item sizes.
    pub items: Option<Vec<f64>>,
    /// Capacity of every bin. Zero counts as missing.
    pub bin_capacity: Option<f64>,
}

impl BinPackingRequest {
    pub fn into_domain(self) -> Result<(Vec<f64>, f64)> {
        let items = self
            .items
            .filter(|items| !items.is_empty())
            .ok_or_else(|| SolverError::missing("items"))?;
        let bin_capacity = self
            .bin_capacity
            .filter(|capacity| *capacity != 0.0)
            .ok_or_else(|| SolverError::missing("bin_capacity"))?;
        Ok((items, bin_capacity))
    }
}

/// Bin packing response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BinPackingResponse {
    /// Item sizes per bin, in bin creation order.
    pub bins: Vec<Vec<f64>>,
}

impl From<Vec<Bin>> for BinPackingResponse {
    fn from(bins: Vec<Bin>) -> Self {
        Self {
            bins: bins.into_iter().map(Bin::into_items).collect(),
        }
    }
}

// ============================================================================
// Partitions
// ============================================================================

/// Partition counting request.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PartitionsRequest {
    pub number: Option<i64>,
}

impl PartitionsRequest {
    pub fn into_domain(self, limits: &SolverLimits) -> Result<u64> {
        let number = self.number.ok_or_else(|| SolverError::missing("number"))?;
        let number = u64::try_from(number)
            .map_err(|_| SolverError::invalid(format!("Number must be non-negative, got {}", number)))?;
        if number > limits.partitions_max_number {
            return Err(SolverError::invalid(format!(
                "Number {} exceeds the limit of {}",
                number, limits.partitions_max_number
            )));
        }
        Ok(number)
    }
}

/// Partition counting response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PartitionsResponse {
    pub partition_count: u128,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_tsp_validation() {
        let limits = SolverLimits::default();
        let ok: TspRequest = parse(json!({ "cities": [[0, 0], [1, 2]] }));
        assert_eq!(ok.into_domain(&limits).unwrap().len(), 2);

        for body in [
            json!({}),
            json!({ "cities": [] }),
            json!({ "cities": [[]] }),
            json!({ "cities": [[0, 0], [1]] }),
        ] {
            let request: TspRequest = parse(body);
            assert!(request.into_domain(&limits).is_err());
        }

        let too_many: TspRequest = parse(json!({ "cities": vec![[0, 0]; 11] }));
        assert!(too_many.into_domain(&limits).is_err());
    }

    #[test]
    fn test_knapsack_zero_capacity_is_not_missing() {
        let limits = SolverLimits::default();
        let request: KnapsackRequest = parse(json!({ "items": [], "capacity": 0 }));
        let (items, capacity) = request.into_domain(&limits).unwrap();
        assert!(items.is_empty());
        assert_eq!(capacity, 0);

        let missing: KnapsackRequest = parse(json!({ "items": [] }));
        assert_eq!(
            missing.into_domain(&limits).unwrap_err(),
            SolverError::missing("capacity")
        );

        let negative: KnapsackRequest =
            parse(json!({ "items": [{ "weight": -1, "value": 2 }], "capacity": 3 }));
        assert!(negative.into_domain(&limits).is_err());
    }

    #[test]
    fn test_node_map_keeps_document_order() {
        let request: GraphColoringRequest =
            serde_json::from_str(r#"{"graph": {"9": [1], "1": [9], "5": []}}"#).unwrap();
        let graph = request.into_domain().unwrap();
        assert_eq!(graph.nodes().collect::<Vec<_>>(), vec![9, 1, 5]);
    }

    #[test]
    fn test_knapsack_table_size_is_bounded() {
        let limits = SolverLimits::default();
        let items = vec![json!({ "weight": 1, "value": 1 }); 5000];
        let request: KnapsackRequest = parse(json!({ "items": items, "capacity": 1_000_000 }));
        assert!(request.into_domain(&limits).is_err());

        let tight = SolverLimits {
            knapsack_max_cells: 12,
            ..limits
        };
        let fits: KnapsackRequest =
            parse(json!({ "items": [{ "weight": 1, "value": 1 }], "capacity": 5 }));
        assert!(fits.into_domain(&tight).is_ok());
        let too_big: KnapsackRequest =
            parse(json!({ "items": [{ "weight": 1, "value": 1 }], "capacity": 6 }));
        assert!(too_big.into_domain(&tight).is_err());
    }

    #[test]
    fn test_hamiltonian_node_limit() {
        let limits = SolverLimits {
            hamiltonian_max_nodes: 3,
            ..SolverLimits::default()
        };
        let ok: HamiltonianCycleRequest = parse(json!({ "graph": vec![vec![1; 3]; 3] }));
        assert_eq!(ok.into_domain(&limits).unwrap().size(), 3);

        let too_big: HamiltonianCycleRequest = parse(json!({ "graph": vec![vec![1; 4]; 4] }));
        assert!(too_big.into_domain(&limits).is_err());
    }

    #[test]
    fn test_neighbors_accept_numeric_strings() {
        let request: GraphColoringRequest =
            serde_json::from_str(r#"{"graph": {"0": ["1"], "1": [0], "2": [" 1 "]}}"#).unwrap();
        let graph = request.into_domain().unwrap();
        assert_eq!(graph.neighbors(0), Some(&[1][..]));
        assert_eq!(graph.neighbors(1), Some(&[0][..]));
        assert_eq!(graph.neighbors(2), Some(&[1][..]));

        let bad: GraphColoringRequest = parse(json!({ "graph": { "0": ["x"] } }));
        assert!(bad.into_domain().is_err());
    }

    #[test]
    fn test_node_map_rejects_non_numeric_keys() {
        let request: GraphColoringRequest = parse(json!({ "graph": { "a": [1] } }));
        assert!(request.into_domain().is_err());

        let empty: GraphColoringRequest = parse(json!({ "graph": {} }));
        assert_eq!(empty.into_domain().unwrap_err(), SolverError::missing("graph"));
    }

    #[test]
    fn test_bin_capacity_zero_is_missing() {
        let request: BinPackingRequest = parse(json!({ "items": [1.0], "bin_capacity": 0 }));
        assert_eq!(
            request.into_domain().unwrap_err(),
            SolverError::missing("bin_capacity")
        );
    }

    #[test]
    fn test_partitions_validation() {
        let limits = SolverLimits::default();
        let zero: PartitionsRequest = parse(json!({ "number": 0 }));
        assert_eq!(zero.into_domain(&limits).unwrap(), 0);

        let negative: PartitionsRequest = parse(json!({ "number": -3 }));
        assert!(negative.into_domain(&limits).is_err());

        let unset: PartitionsRequest = parse(json!({ "number": null }));
        assert_eq!(unset.into_domain(&limits).unwrap_err(), SolverError::missing("number"));
    }

    #[test]
    fn test_hamiltonian_response_shapes() {
        let found = serde_json::to_value(HamiltonianCycleResponse::from(
            HamiltonianOutcome::Cycle(vec![0, 1, 0]),
        ))
        .unwrap();
        assert_eq!(found, json!({ "cycle": [0, 1, 0] }));

        let none = serde_json::to_value(HamiltonianCycleResponse::from(HamiltonianOutcome::NoCycle))
            .unwrap();
        assert_eq!(none, json!({ "message": "No Hamiltonian cycle found" }));
    }
}
