//! Embedded cp(T) point sets for the table-backed gas path.
//!
//! The original property tables are generated offline by integrating species
//! thermochemical data over 50–2000 K. Here the integration happens at
//! construction time ([`crate::TabularGas::from_cp_points`]) from these
//! embedded specific-heat knots.

/// Temperature knots [K] shared by both gases.
pub const T_PTS: [f64; 30] = [
    50.0, 100.0, 150.0, 200.0, 250.0, 300.0, 350.0, 400.0, 450.0, 500.0, 550.0, 600.0, 650.0,
    700.0, 750.0, 800.0, 850.0, 900.0, 950.0, 1000.0, 1100.0, 1200.0, 1300.0, 1400.0, 1500.0,
    1600.0, 1700.0, 1800.0, 1900.0, 2000.0,
];

/// Dry air cp [J/(kg·K)] at [`T_PTS`].
pub const AIR_CP: [f64; 30] = [
    1002.0, 1002.0, 1002.3, 1002.5, 1003.1, 1005.0, 1008.2, 1013.5, 1020.6, 1029.5, 1040.0,
    1051.1, 1062.9, 1075.0, 1087.0, 1098.7, 1109.9, 1120.6, 1130.7, 1140.1, 1157.1, 1172.0,
    1185.1, 1196.7, 1206.9, 1216.0, 1224.1, 1231.3, 1237.8, 1243.7,
];

/// Vitiated combustion products cp [J/(kg·K)] at [`T_PTS`]
/// (kerosene-class fuel burned in air near stoichiometric-lean conditions).
pub const PRODUCTS_CP: [f64; 30] = [
    1050.0, 1050.0, 1050.4, 1050.8, 1051.6, 1054.0, 1058.0, 1064.4, 1072.8, 1083.1, 1095.0,
    1107.8, 1121.0, 1134.4, 1147.6, 1160.4, 1172.6, 1184.2, 1195.1, 1205.3, 1223.7, 1239.8,
    1253.9, 1266.3, 1277.3, 1287.0, 1295.7, 1303.4, 1310.3, 1316.6,
];
