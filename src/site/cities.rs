//! Latitudes of the cities offered by the site editor.

/// A named city and its latitude in degrees (positive north).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct City {
    pub name: &'static str,
    pub latitude: f64,
}

const fn city(name: &'static str, latitude: f64) -> City {
    City { name, latitude }
}

/// Chinese cities followed by a few international ones.
pub const CITIES: &[City] = &[
    city("Beijing", 39.90),
    city("Shanghai", 31.23),
    city("Guangzhou", 23.13),
    city("Shenzhen", 22.54),
    city("Tianjin", 39.13),
    city("Chongqing", 29.56),
    city("Chengdu", 30.57),
    city("Hangzhou", 30.27),
    city("Wuhan", 30.58),
    city("Nanjing", 32.06),
    city("Xi'an", 34.27),
    city("Suzhou", 31.30),
    city("Zhengzhou", 34.75),
    city("Changsha", 28.23),
    city("Qingdao", 36.07),
    city("Jinan", 36.65),
    city("Shenyang", 41.80),
    city("Dalian", 38.91),
    city("Harbin", 45.75),
    city("Changchun", 43.88),
    city("Xiamen", 24.48),
    city("Fuzhou", 26.08),
    city("Hefei", 31.86),
    city("Kunming", 25.04),
    city("Guiyang", 26.58),
    city("Nanchang", 28.68),
    city("Nanning", 22.82),
    city("Shijiazhuang", 38.04),
    city("Taiyuan", 37.87),
    city("Lanzhou", 36.06),
    city("Xining", 36.62),
    city("Yinchuan", 38.47),
    city("Hohhot", 40.84),
    city("Urumqi", 43.83),
    city("Lhasa", 29.65),
    city("Haikou", 20.04),
    city("Sanya", 18.25),
    city("Zhuhai", 22.27),
    city("Wuxi", 31.49),
    city("Ningbo", 29.87),
    city("Wenzhou", 28.00),
    city("Dongguan", 23.02),
    city("Foshan", 23.02),
    city("Yantai", 37.46),
    city("Weihai", 37.51),
    city("Luoyang", 34.62),
    city("Xuzhou", 34.26),
    city("Changzhou", 31.79),
    city("Yangzhou", 32.39),
    city("Shaoxing", 30.00),
    city("Tokyo", 35.68),
    city("Seoul", 37.57),
    city("Singapore", 1.35),
    city("Bangkok", 13.76),
    city("Sydney", -33.87),
    city("Melbourne", -37.81),
    city("New York", 40.71),
    city("Los Angeles", 34.05),
    city("London", 51.51),
    city("Paris", 48.86),
    city("Berlin", 52.52),
    city("Dubai", 25.20),
    city("Moscow", 55.76),
    city("Toronto", 43.65),
    city("Vancouver", 49.28),
];

/// Latitude of the city called `name` (case-insensitive).
pub fn latitude_of(name: &str) -> Option<f64> {
    let name = name.trim();
    CITIES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .map(|c| c.latitude)
}

/// City whose latitude is within 0.01° of `latitude`, if any.
pub fn city_at(latitude: f64) -> Option<&'static City> {
    CITIES.iter().find(|c| (c.latitude - latitude).abs() < 0.01)
}
