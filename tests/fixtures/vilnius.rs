//! Real Vilnius stop coordinates (from OpenStreetMap).

use tour_planner::geometry::Point;

/// Central Vilnius locations: old town, station, and river-side stops.
pub fn stops() -> Vec<Point> {
    vec![
        Point::new(54.68716, 25.27958), // Cathedral Square
        Point::new(54.67885, 25.28697), // Town Hall
        Point::new(54.67060, 25.27279), // Railway Station
        Point::new(54.68954, 25.27037), // Gediminas Avenue west
        Point::new(54.69661, 25.29067), // Kalvarijų market
        Point::new(54.68313, 25.29105), // Bernardinai Garden
        Point::new(54.67405, 25.26304), // Naujamiestis
        Point::new(54.69253, 25.26942), // Žvėrynas bridge
    ]
}
