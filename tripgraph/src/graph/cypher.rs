//! Cypher statements issued by [`super::Neo4jGraphStore`]. Location ids are
//! stored in the `name` property of `:Location` nodes, trips are `:TRIP`
//! relationships from pickup to dropoff.

pub const VERIFY_CONNECTIVITY: &str = "RETURN 1 AS ok";

pub const CREATE_LOCATION_CONSTRAINT: &str = "
CREATE CONSTRAINT location_name_unique
IF NOT EXISTS
FOR (l:Location)
REQUIRE l.name IS UNIQUE
";

/// params: `$url`. column names match the staging file header.
pub const LOAD_TRIPS_CSV: &str = "
LOAD CSV WITH HEADERS FROM $url AS row
MERGE (start:Location {name: toInteger(row.PULocationID)})
MERGE (end:Location {name: toInteger(row.DOLocationID)})
CREATE (start)-[:TRIP {
    distance: toFloat(row.trip_distance),
    fare: toFloat(row.fare_amount),
    pickup_dt: datetime(row.tpep_pickup_datetime),
    dropoff_dt: datetime(row.tpep_dropoff_datetime)
}]->(end)
";

pub const COUNT_LOCATIONS: &str = "MATCH (l:Location) RETURN count(l) AS count";

/// params: `$graphName`. a missing projection is not an error.
pub const DROP_PROJECTION: &str = "
CALL gds.graph.drop($graphName, false) YIELD graphName
RETURN graphName
";

/// params: `$graphName`, `$weightProperty`. isolated locations are kept, and
/// trips without the weight property are projected with weight 1.0.
pub const PROJECT_LOCATIONS: &str = "
MATCH (source:Location)
OPTIONAL MATCH (source)-[t:TRIP]->(target:Location)
WITH gds.graph.project(
    $graphName,
    source,
    target,
    { relationshipProperties: { weight: coalesce(toFloat(t[$weightProperty]), 1.0) } }
) AS g
RETURN g.nodeCount AS nodeCount
";

/// params: `$graphName`, `$maxIterations`, `$dampingFactor`.
pub const PAGERANK_STREAM: &str = "
CALL gds.pageRank.stream($graphName, {
    maxIterations: $maxIterations,
    dampingFactor: $dampingFactor,
    relationshipWeightProperty: 'weight'
})
YIELD nodeId, score
RETURN gds.util.asNode(nodeId).name AS name, score
ORDER BY score DESC, name ASC
";

/// params: `$start`, `$end`. must not be used with `$start = $end`.
pub const SHORTEST_PATH: &str = "
MATCH p = shortestPath(
    (start:Location {name: $start})-[:TRIP*]-(end:Location {name: $end})
)
RETURN [n IN nodes(p) | n.name] AS path
";

/// params: `$name`
pub const FIND_LOCATION: &str = "MATCH (l:Location {name: $name}) RETURN l.name AS name";
