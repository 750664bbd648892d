use serde::{Deserialize, Serialize};

use crate::{
    error::{CifpResult, Error},
    geo::{Altitude, Coordinate, Course},
};

use super::{aerodrome::ApproachCategory, field::RecordLine};

/// The four navaid class columns: facility, collocation/marker, power and
/// voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavaidClass {
    pub facility: char,
    pub collocation: char,
    pub power: char,
    pub voice: char,
}

impl NavaidClass {
    fn try_from_line(line: &RecordLine) -> Self {
        Self {
            facility: line.char_at(27),
            collocation: line.char_at(28),
            power: line.char_at(29),
            voice: line.char_at(30),
        }
    }

    pub fn has_dme(&self) -> bool {
        matches!(self.collocation, 'D' | 'T' | 'M' | 'I')
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dme {
    pub identifier: String,
    pub channel: u16,
    pub position: Coordinate,
    pub elevation: Altitude,
}

impl Dme {
    fn try_from_line(line: &RecordLine) -> CifpResult<Self> {
        let class = NavaidClass::try_from_line(line);
        if !class.has_dme() {
            return Err(Error::format(28));
        }

        let frequency = vhf_frequency(line)?;
        let identifier = line
            .optional_text(51, 55)
            .unwrap_or_else(|| line.text(13, 17));

        Ok(Self {
            identifier,
            channel: dme_channel(frequency).ok_or(Error::format(22))?,
            position: line.coordinate(55, 74)?,
            elevation: Altitude::msl(line.number(79, 84)?),
        })
    }
}

/// Maps a paired VHF frequency (MHz) to its X band DME channel.
pub fn dme_channel(frequency: f64) -> Option<u16> {
    let tenths = (frequency * 10.0).round() as u16;
    match tenths {
        1344..=1359 => Some(tenths - 1344 + 1),
        1080..=1122 => Some(tenths - 1080 + 17),
        1333..=1342 => Some(tenths - 1333 + 60),
        1123..=1179 => Some(tenths - 1123 + 70),
        _ => None,
    }
}

fn vhf_frequency(line: &RecordLine) -> CifpResult<f64> {
    line.scaled(22, 27, 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NavaidKind {
    Ndb {
        channel: u16,
        #[serde(default)]
        airport: Option<String>,
    },
    Vor {
        frequency: f64,
        elevation: Altitude,
        dme: Option<Dme>,
    },
    Localizer {
        airport: String,
        frequency: f64,
        elevation: Altitude,
        dme: Dme,
    },
    Dme { dme: Dme },
    #[serde(rename_all = "camelCase")]
    Ils {
        airport: String,
        runway: String,
        category: ApproachCategory,
        frequency: f64,
        localizer_course: Course,
        glideslope: Option<Coordinate>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Navaid {
    pub client: String,
    pub identifier: String,
    pub position: Coordinate,
    pub magnetic_variation: Option<f64>,
    pub name: String,
    pub class: Option<NavaidClass>,
    pub kind: NavaidKind,
    pub file_record_number: u32,
    pub cycle: u16,
}

impl Navaid {
    /// Enroute (`DB`) or terminal (`PN`) NDB.
    pub fn try_from_ndb(line: &RecordLine) -> CifpResult<Self> {
        line.check(0, 1, &["S"])?;
        line.check(4, 6, &["DB", "PN"])?;
        line.check_empty(12, 13)?;
        line.check_empty(17, 19)?;
        line.check(21, 23, &["00"])?;
        line.check(26, 27, &["0"])?;
        // No BFO collocation
        line.check_empty(31, 32)?;
        line.check_empty(51, 74)?;
        line.check_empty(79, 90)?;
        line.check(90, 93, &["NAR"])?;

        Ok(Self {
            client: line.text(1, 4),
            identifier: line.text(13, 17),
            position: line.coordinate(32, 51)?,
            magnetic_variation: line.magnetic_variation(74, 75, 79)?,
            name: line.text(93, 123),
            class: Some(NavaidClass::try_from_line(line)),
            kind: NavaidKind::Ndb {
                channel: line.number(23, 26)?,
                airport: line.optional_text(6, 10),
            },
            file_record_number: line.file_record_number()?,
            cycle: line.cycle()?,
        })
    }

    /// VHF navaid (`D `): localizer DME, VOR or standalone DME depending on
    /// the class columns.
    pub fn try_from_vhf(line: &RecordLine) -> CifpResult<Self> {
        line.check(0, 1, &["S"])?;
        line.check(4, 6, &["D "])?;
        line.check(17, 19, &["  "])?;
        line.check(21, 22, &["0"])?;
        line.check(90, 93, &["NAR"])?;

        let class = NavaidClass::try_from_line(line);
        let frequency = vhf_frequency(line)?;
        let identifier = line.text(13, 17);

        let (position, kind) = if class.collocation == 'I' {
            let dme = Dme::try_from_line(line)?;
            let kind = NavaidKind::Localizer {
                airport: line.text(6, 10),
                frequency,
                elevation: dme.elevation,
                dme: dme.clone(),
            };
            (dme.position, kind)
        } else if class.facility == 'V' {
            line.check(4, 13, &["D        "])?;
            line.check_empty(31, 32)?;
            let dme = if matches!(class.collocation, 'D' | 'T') {
                if !line.is_blank(51, 55) && line.text(51, 55) != identifier {
                    return Err(Error::format(51));
                }
                Some(Dme::try_from_line(line)?)
            } else {
                line.check_empty(51, 74)?;
                None
            };
            let kind = NavaidKind::Vor {
                frequency,
                elevation: Altitude::msl(line.number(79, 84)?),
                dme,
            };
            (line.coordinate(32, 51)?, kind)
        } else {
            let dme = Dme::try_from_line(line)?;
            (dme.position, NavaidKind::Dme { dme })
        };

        let magnetic_variation = match kind {
            NavaidKind::Dme { .. } => None,
            _ => line.magnetic_variation(74, 75, 79)?,
        };

        Ok(Self {
            client: line.text(1, 4),
            identifier,
            position,
            magnetic_variation,
            name: line.text(93, 123),
            class: Some(class),
            kind,
            file_record_number: line.file_record_number()?,
            cycle: line.cycle()?,
        })
    }

    /// Runway localizer/glideslope (`P` + `I`).
    pub fn try_from_ils(line: &RecordLine) -> CifpResult<Self> {
        line.check(0, 1, &["S"])?;
        line.check(4, 6, &["P "])?;
        line.check(12, 13, &["I"])?;
        line.check_empty(18, 21)?;
        line.check(21, 22, &["0"])?;

        let airport = line.text(6, 10);
        let identifier = line.text(13, 17);
        let runway = line.text(27, 32);
        let variation = line.magnetic_variation(90, 91, 95)?;
        let localizer_course = Course::magnetic(line.scaled(51, 55, 10.0)?, variation);

        Ok(Self {
            client: line.text(1, 4),
            name: format!("{identifier} ({airport} - {runway})"),
            identifier,
            position: line.coordinate(32, 51)?,
            magnetic_variation: variation,
            class: None,
            kind: NavaidKind::Ils {
                category: ApproachCategory::try_from(line.char_at(17)).map_err(|_| Error::format(17))?,
                frequency: vhf_frequency(line)?,
                runway,
                airport,
                localizer_course,
                glideslope: line.optional_coordinate(55, 74)?,
            },
            file_record_number: line.file_record_number()?,
            cycle: line.cycle()?,
        })
    }
}
