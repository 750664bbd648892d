use std::{collections::HashMap, io::Write};

use crate::{
    config::LoaderConfig,
    error::Error,
    geo::{Altitude, Coordinate},
    loaders::cifp::{
        aerodrome::{Aerodrome, AerodromeKind, AirportUsage},
        airspace::{AirspaceSegment, GridMora},
        field::RecordLine,
        loader::CifpLoader,
        procedure::{ProcedureKind, ProcedureLine},
        reader::CifpReader,
    },
    package::{
        airspace::Airspace,
        cache,
        guidance::{Endpoint, Via},
        resolver::{FixTable, Resolver, DEFAULT_VARIATION_RADII},
        Instruction, Procedure,
    },
};

const MORA_UNKNOWN: &str = "S   AS       N13E150          UNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNK   000231703";
const MORA_SPARSE: &str = "S   AS       N28W090          015014UNKUNKUNKUNKUNK027031031UNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNKUNK   000661703";
const MORA_FULL: &str = "S   AS       N49W120          109110116123135125119070085072069063048047047041040048036040040033034028028030030031032033   001372007";

const NDB_UAD: &str = "SUSADB       UAD   K2002630H MW N36292727W121282967                       E0160           NARCHUALAR                       256521703";

const KSBA: [&str; 5] = [
    "SUSAUCK2AKSBA PAC  A00100     CE                   N34253400W1195026000050       GND  A04000MSANTA BARBARA MUNI            460392014",
    "SUSAUCK2AKSBA PAC  B00200     G N34253390W119442280                              01500M04000MSANTA BARBARA MUNI            460402014",
    "SUSAUCK2AKSBA PAC  B00300     R N34253340W119382020N34253400W11950260001000900                                             460411703",
    "SUSAUCK2AKSBA PAC  B00400     G N34294750W120012340                                                                        460421703",
    "SUSAUCK2AKSBA PAC  B00500     LEN34274090W119555430N34253400W11950260000502950                                             460431703",
];

const KTOA: [&str; 15] = [
    "SUSAUCK2ZKTOA PAD  A00100     G N33472816W118232186                              GND  A02400MTORRANCE                      486791703",
    "SUSAUCK2ZKTOA PAD  A00200     G N33484675W118254157                                                                        486801703",
    "SUSAUCK2ZKTOA PAD  A00300     G N33501175W118243307                                                                        486811703",
    "SUSAUCK2ZKTOA PAD  A00400     G N33503755W118245157                                                                        486821703",
    "SUSAUCK2ZKTOA PAD  A00500     G N33511075W118234537                                                                        486831703",
    "SUSAUCK2ZKTOA PAD  A00600     G N33520605W118230067                                                                        486841703",
    "SUSAUCK2ZKTOA PAD  A00700     G N33514865W118222967                                                                        486851703",
    "SUSAUCK2ZKTOA PAD  A00800     G N33514960W118222780                                                                        486862002",
    "SUSAUCK2ZKTOA PAD  A00900     G N33524135W118204457                                                                        486872002",
    "SUSAUCK2ZKTOA PAD  A01000     G N33522430W118203230                                                                        486882002",
    "SUSAUCK2ZKTOA PAD  A01100     R N33503826W118191586N33481200W11820220000260207                                             486892002",
    "SUSAUCK2ZKTOA PAD  A01200     G N33483066W118171646                                                                        486902002",
    "SUSAUCK2ZKTOA PAD  A01300     G N33465597W118145155                                                                        486912002",
    "SUSAUCK2ZKTOA PAD  A01400     G N33440547W118173106                                                                        486922002",
    "SUSAUCK2ZKTOA PAD  A01500     REN33453776W118195246N33481200W11820220000261709                                             486932002",
];

const LAX: [&str; 88] = [
    "SUSAUCK2TKLAX PAB  A00100     G N33595000W118444300                              GND  A10000MLOS ANGELES AREA A            472071703",
    "SUSAUCK2TKLAX PAB  A00200     G N34002300W118323300                                                                        472081703",
    "SUSAUCK2TKLAX PAB  A00300     G N33574200W118272300                                                                        472091703",
    "SUSAUCK2TKLAX PAB  A00400     G N33574200W118221000                                                                        472101703",
    "SUSAUCK2TKLAX PAB  A00500     G N34010000W118150000                                                                        472111703",
    "SUSAUCK2TKLAX PAB  A00600     G N33554800W118135200                                                                        472121703",
    "SUSAUCK2TKLAX PAB  A00700     G N33555100W118260500                                                                        472131703",
    "SUSAUCK2TKLAX PAB  A00800     G N33453400W118270100                                                                        472141703",
    "SUSAUCK2TKLAX PAB  A00900     GEN33451400W118322900                                                                        472151703",
    "SUSAUCK2TKLAX PAB  B01000     G N34010000W118150000                              02000M10000MLOS ANGELES AREA B            472161703",
    "SUSAUCK2TKLAX PAB  B01100     G N34000100W118075800                                                                        472171703",
    "SUSAUCK2TKLAX PAB  B01200     G N33561000W118072100                                                                        472181703",
    "SUSAUCK2TKLAX PAB  B01300     GEN33554800W118135200                                                                        472191703",
    "SUSAUCK2TKLAX PAB  C01400     G N33574200W118221000                              02500M10000MLOS ANGELES AREA C            472201703",
    "SUSAUCK2TKLAX PAB  C01500     G N34002000W118230500                                                                        472211703",
    "SUSAUCK2TKLAX PAB  C01600     G N34024900W118214800                                                                        472221703",
    "SUSAUCK2TKLAX PAB  C01700     G N34060000W118142400                                                                        472231703",
    "SUSAUCK2TKLAX PAB  C01800     G N34060000W118112300                                                                        472241703",
    "SUSAUCK2TKLAX PAB  C01900     G N34020300W118033900                                                                        472251703",
    "SUSAUCK2TKLAX PAB  C02000     G N33584000W118014900                                                                        472261703",
    "SUSAUCK2TKLAX PAB  C02100     G N33534400W118015200                                                                        472271703",
    "SUSAUCK2TKLAX PAB  C02200     G N33531700W118105000                                                                        472281703",
    "SUSAUCK2TKLAX PAB  C02300     G N33554800W118135200                                                                        472291703",
    "SUSAUCK2TKLAX PAB  C02400     G N33561000W118072100                                                                        472301703",
    "SUSAUCK2TKLAX PAB  C02500     G N34000100W118075800                                                                        472311703",
    "SUSAUCK2TKLAX PAB  C02600     GEN34010000W118150000                                                                        472321703",
    "SUSAUCK2TKLAX PAB  D02700     G N34060000W118112300                              04000M10000MLOS ANGELES AREA D            472331703",
    "SUSAUCK2TKLAX PAB  D02800     G N34004500W117540300                                                                        472341703",
    "SUSAUCK2TKLAX PAB  D02900     G N33574000W117533500                                                                        472351703",
    "SUSAUCK2TKLAX PAB  D03000     G N33540400W117543500                                                                        472361703",
    "SUSAUCK2TKLAX PAB  D03100     G N33534400W118015200                                                                        472371703",
    "SUSAUCK2TKLAX PAB  D03200     G N33584000W118014900                                                                        472381703",
    "SUSAUCK2TKLAX PAB  D03300     GEN34020300W118033900                                                                        472391703",
    "SUSAUCK2TKLAX PAB  E03400     G N33540400W117543500                              07000M10000MLOS ANGELES AREA E            472401703",
    "SUSAUCK2TKLAX PAB  E03500     G N33542300W117474200                                                                        472411703",
    "SUSAUCK2TKLAX PAB  E03600     G N34024200W117500000                                                                        472421703",
    "SUSAUCK2TKLAX PAB  E03700     G N34022200W117592300                                                                        472431703",
    "SUSAUCK2TKLAX PAB  E03800     G N34004500W117540300                                                                        472441703",
    "SUSAUCK2TKLAX PAB  E03900     GEN33574000W117533500                                                                        472451703",
    "SUSAUCK2TKLAX PAB  F04000     G N33542300W117474200                              08000M10000MLOS ANGELES AREA F            472461703",
    "SUSAUCK2TKLAX PAB  F04100     G N33543100W117444500                                                                        472471703",
    "SUSAUCK2TKLAX PAB  F04200     G N34025700W117451600                                                                        472481703",
    "SUSAUCK2TKLAX PAB  F04300     GEN34024200W117500000                                                                        472491703",
    "SUSAUCK2TKLAX PAB  G04400     G N33543100W117444500                              09000M10000MLOS ANGELES AREA G            472501703",
    "SUSAUCK2TKLAX PAB  G04500     G N33543900W117414800                                                                        472511703",
    "SUSAUCK2TKLAX PAB  G04600     G N34004400W117405400                                                                        472521703",
    "SUSAUCK2TKLAX PAB  G04700     G N34025900W117442900                                                                        472531703",
    "SUSAUCK2TKLAX PAB  G04800     GEN34025700W117451600                                                                        472541703",
    "SUSAUCK2TKLAX PAB  H04900     G N33534400W118015200                              05000M10000MLOS ANGELES AREA H            472551703",
    "SUSAUCK2TKLAX PAB  H05000     G N33470000W118031700                                                                        472561703",
    "SUSAUCK2TKLAX PAB  H05100     G N33464000W118085300                                                                        472571703",
    "SUSAUCK2TKLAX PAB  H05200     G N33453400W118270100                                                                        472581703",
    "SUSAUCK2TKLAX PAB  H05300     G N33555100W118260500                                                                        472591703",
    "SUSAUCK2TKLAX PAB  H05400     G N33554800W118135200                                                                        472601703",
    "SUSAUCK2TKLAX PAB  H05500     GEN33531700W118105000                                                                        472611703",
    "SUSAUCK2TKLAX PAB  I05600     G N33540400W117543500                              06000M10000MLOS ANGELES AREA I            472621703",
    "SUSAUCK2TKLAX PAB  I05700     G N33472300W117574000                                                                        472631703",
    "SUSAUCK2TKLAX PAB  I05800     G N33470000W118031700                                                                        472641703",
    "SUSAUCK2TKLAX PAB  I05900     GEN33534400W118015200                                                                        472651703",
    "SUSAUCK2TKLAX PAB  J06000     G N33472300W117574000                              07000M10000MLOS ANGELES AREA J            472661703",
    "SUSAUCK2TKLAX PAB  J06100     G N33355200W117535900                                                                        472671703",
    "SUSAUCK2TKLAX PAB  J06200     G N33313400W118031100                                                                        472681703",
    "SUSAUCK2TKLAX PAB  J06300     G N33375600W118090400                                                                        472691703",
    "SUSAUCK2TKLAX PAB  J06400     G N33464000W118085300                                                                        472701703",
    "SUSAUCK2TKLAX PAB  J06500     GEN33470000W118031700                                                                        472711703",
    "SUSAUCK2TKLAX PAB  K06600     G N33375600W118090400                              08000M10000MLOS ANGELES AREA K            472721703",
    "SUSAUCK2TKLAX PAB  K06700     G N33360900W118253800                                                                        472731703",
    "SUSAUCK2TKLAX PAB  K06800     G N33453400W118270100                                                                        472741703",
    "SUSAUCK2TKLAX PAB  K06900     GEN33464000W118085300                                                                        472751703",
    "SUSAUCK2TKLAX PAB  L07000     G N33360900W118253800                              05000M10000MLOS ANGELES AREA L            472761703",
    "SUSAUCK2TKLAX PAB  L07100     G N33351100W118343100                                                                        472771703",
    "SUSAUCK2TKLAX PAB  L07200     G N33442700W118422300                                                                        472781703",
    "SUSAUCK2TKLAX PAB  L07300     G N33451400W118322900                                                                        472791703",
    "SUSAUCK2TKLAX PAB  L07400     GEN33453400W118270100                                                                        472801703",
    "SUSAUCK2TKLAX PAB  M07500     G N33442700W118422300                              02000M10000MLOS ANGELES AREA M            472811703",
    "SUSAUCK2TKLAX PAB  M07600     G N33584800W118542700                                                                        472821703",
    "SUSAUCK2TKLAX PAB  M07700     G N33592600W118532300                                                                        472831703",
    "SUSAUCK2TKLAX PAB  M07800     G N33595000W118444300                                                                        472841703",
    "SUSAUCK2TKLAX PAB  M07900     GEN33451400W118322900                                                                        472851703",
    "SUSAUCK2TKLAX PAB  N08000     G N33592600W118532300                              05000M10000MLOS ANGELES AREA N            472861703",
    "SUSAUCK2TKLAX PAB  N08100     G N34060000W118421200                                                                        472871703",
    "SUSAUCK2TKLAX PAB  N08200     G N34060000W118142400                                                                        472881703",
    "SUSAUCK2TKLAX PAB  N08300     G N34024900W118214800                                                                        472891703",
    "SUSAUCK2TKLAX PAB  N08400     G N34002000W118230500                                                                        472901703",
    "SUSAUCK2TKLAX PAB  N08500     G N33574200W118221000                                                                        472911703",
    "SUSAUCK2TKLAX PAB  N08600     G N33574200W118272300                                                                        472921703",
    "SUSAUCK2TKLAX PAB  N08700     G N34002300W118323300                                                                        472931703",
    "SUSAUCK2TKLAX PAB  N08800     GEN33595000W118444300                                                                        472941703",
];

const ZELAN4: [&str; 32] = [
    "SUSAP KATLK7DZELAN44RW27R 010CPARKK7PC0E       CF ATL K7      2799003927500052D               18000                        209121705",
    "SUSAP KATLK7DZELAN44RW27R 020MPASSK7PC0E   R   RF       0034602750    00550055                            CFZJF K7PC       209131911",
    "SUSAP KATLK7DZELAN44RW27R 030ZELANK7PC0EE      TF                                 + 06000          250                     209141705",
    "SUSAP KATLK7DZELAN46BOBBD 010ZELANK7PC0E       IF                                 + 06000     18000250                     209151705",
    "SUSAP KATLK7DZELAN46BOBBD 020SMKEYK7PC0E       TF                                                                          209161705",
    "SUSAP KATLK7DZELAN46BOBBD 030HUCHHK7PC0E       TF                                                                          209171705",
    "SUSAP KATLK7DZELAN46BOBBD 040BOBBDK7EA0EE      TF                                                                          209181705",
    "SUSAP KATLK7DZELAN46EMAHH 010ZELANK7PC0E       IF                                 + 06000     18000250                     209191705",
    "SUSAP KATLK7DZELAN46EMAHH 020WURLDK7PC0E       TF                                                                          209201705",
    "SUSAP KATLK7DZELAN46EMAHH 030PENCLK7PC0E       TF                                                                          209211705",
    "SUSAP KATLK7DZELAN46EMAHH 040LEDRRK7PC0E       TF                                                                          209221705",
    "SUSAP KATLK7DZELAN46EMAHH 050EMAHHK7PC0EE      TF                                                                          209231705",
    "SUSAP KATLK7DZELAN46GLAZR 010ZELANK7PC0E       IF                                 + 06000     18000250                     209241705",
    "SUSAP KATLK7DZELAN46GLAZR 020WURLDK7PC0E       TF                                                                          209251705",
    "SUSAP KATLK7DZELAN46GLAZR 030VARNMK7PC0E       TF                                                                          209261705",
    "SUSAP KATLK7DZELAN46GLAZR 040GLAZRK7EA0EE      TF                                                                          209271705",
    "SUSAP KATLK7DZELAN46JAACE 010ZELANK7PC0E       IF                                 + 06000     18000250                     209281705",
    "SUSAP KATLK7DZELAN46JAACE 020WURLDK7PC0E       TF                                                                          209291705",
    "SUSAP KATLK7DZELAN46JAACE 030PENCLK7PC0E       TF                                                                          209301705",
    "SUSAP KATLK7DZELAN46JAACE 040LEDRRK7PC0E       TF                                                                          209311705",
    "SUSAP KATLK7DZELAN46JAACE 050JAACEK7PC0EE      TF                                                                          209321705",
    "SUSAP KATLK7DZELAN46RAFTN 010ZELANK7PC0E       IF                                 + 06000     18000250                     209331705",
    "SUSAP KATLK7DZELAN46RAFTN 020PADGTK7PC0E       TF                                                                          209341705",
    "SUSAP KATLK7DZELAN46RAFTN 030RAFTNK7PC0EE      TF                                                                          209351705",
    "SUSAP KATLK7DZELAN46RESPE 010ZELANK7PC0E       IF                                 + 06000     18000250                     209361705",
    "SUSAP KATLK7DZELAN46RESPE 020WURLDK7PC0E       TF                                                                          209371705",
    "SUSAP KATLK7DZELAN46RESPE 030VARNMK7PC0E       TF                                                                          209381705",
    "SUSAP KATLK7DZELAN46RESPE 040RESPEK7EA0EE      TF                                                                          209391705",
    "SUSAP KATLK7DZELAN46SMTTH 010ZELANK7PC0E       IF                                 + 06000     18000250                     209401705",
    "SUSAP KATLK7DZELAN46SMTTH 020PADGTK7PC0E       TF                                                                          209411705",
    "SUSAP KATLK7DZELAN46SMTTH 030COLVNK7PC0E       TF                                                                          209421705",
    "SUSAP KATLK7DZELAN46SMTTH 040SMTTHK7EA0EE      TF                                                                          209431705",
];

fn assemble(lines: &[&str]) -> Airspace {
    let segments = lines
        .iter()
        .map(|line| {
            AirspaceSegment::try_from_controlled(&RecordLine::new(line).unwrap())
                .unwrap()
                .unwrap()
        })
        .collect();
    Airspace::try_assemble(segments).unwrap()
}

fn point(token: &str) -> Coordinate {
    token.parse().unwrap()
}

fn check_airspace(lines: &[&str], inside: [&str; 2], outside: [&str; 2]) {
    let airspace = assemble(lines);
    for token in inside {
        assert!(airspace.contains(point(token), Altitude::msl(2100)), "{token} should be inside");
        assert!(!airspace.contains(point(token), Altitude::msl(20000)), "{token} is above the ceiling");
    }
    for token in outside {
        assert!(!airspace.contains(point(token), Altitude::msl(2100)), "{token} should be outside");
    }
}

#[test]
fn test_santa_barbara_airspace() {
    check_airspace(
        &KSBA,
        ["N34262100W119513600", "N34283900W120005200"],
        ["N34289700W119565200", "N34151200W119461800"],
    );
}

#[test]
fn test_torrance_airspace() {
    check_airspace(
        &KTOA,
        ["N33504000W118242300", "N33471500W118213700"],
        ["N33501000W118250000", "N34151200W119461800"],
    );
}

#[test]
fn test_los_angeles_airspace() {
    let airspace = assemble(&LAX);
    assert_eq!(airspace.loops.len(), 14);
    assert_eq!(airspace.name.as_deref(), Some("LOS ANGELES AREA A"));
    check_airspace(
        &LAX,
        ["N334538W1184156", "N335930W1180923"],
        ["N335209W1182122", "N340235W1180924"],
    );
}

#[test]
fn test_grid_mora() {
    let parse = |line: &str| GridMora::try_from_line(&RecordLine::new(line).unwrap()).unwrap();
    let hundreds = |mora: &GridMora| mora.moras.iter().map(|value| value.map(|altitude| altitude.feet() / 100)).collect::<Vec<_>>();

    let unknown = parse(MORA_UNKNOWN);
    assert_eq!(unknown.start, Coordinate::new(13.0, 150.0));
    assert_eq!(hundreds(&unknown), vec![None; 30]);

    let sparse = parse(MORA_SPARSE);
    assert_eq!(sparse.start, Coordinate::new(28.0, -90.0));
    assert_eq!(sparse.file_record_number, 66);
    let mut expected = vec![None; 30];
    for (index, value) in [(0, 15), (1, 14), (7, 27), (8, 31), (9, 31)] {
        expected[index] = Some(value);
    }
    assert_eq!(hundreds(&sparse), expected);

    let full = parse(MORA_FULL);
    assert_eq!(full.start, Coordinate::new(49.0, -120.0));
    assert_eq!(full.cycle, 2007);
    assert_eq!(full.file_record_number, 137);
    let values = hundreds(&full);
    assert_eq!(values.len(), 30);
    assert_eq!(values[0], Some(109));
    assert_eq!(values[4], Some(135));
    assert_eq!(values[29], Some(33));
}

fn atlanta() -> Aerodrome {
    Aerodrome {
        client: "US".to_owned(),
        identifier: "KATL".to_owned(),
        iata: Some("ATL".to_owned()),
        kind: AerodromeKind::Airport { max_runway_length: 12390 },
        ifr: true,
        location: Coordinate::new(33.6367, -84.4281),
        magnetic_variation: 5.0,
        elevation: Altitude::msl(1026),
        transition_altitude: Altitude::msl(18000),
        transition_level: Altitude::flight_level(180),
        usage: AirportUsage::Civil,
        name: "HARTSFIELD - JACKSON ATLANTA INTL".to_owned(),
        file_record_number: 1,
        cycle: 1705,
    }
}

fn zelan_fixes() -> FixTable {
    let names = [
        "CPARK", "MPASS", "CFZJF", "ZELAN", "SMKEY", "HUCHH", "BOBBD", "WURLD", "PENCL", "LEDRR", "EMAHH", "VARNM",
        "GLAZR", "JAACE", "PADGT", "RAFTN", "RESPE", "COLVN", "SMTTH",
    ];
    let mut fixes = FixTable::default();
    for (index, name) in names.iter().enumerate() {
        fixes.insert(*name, Coordinate::new(33.6 + index as f64 * 0.02, -84.5 - index as f64 * 0.03));
    }
    fixes
}

fn endpoint_names(instructions: &[Instruction]) -> Vec<&str> {
    instructions
        .iter()
        .filter_map(|instruction| match &instruction.endpoint {
            Some(Endpoint::Fix { fix }) => Some(fix.name.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_zelan_departure() {
    let legs: Vec<ProcedureLine> = ZELAN4
        .iter()
        .map(|line| ProcedureLine::try_from_line(&RecordLine::new(line).unwrap()).unwrap().unwrap())
        .collect();

    let fixes = zelan_fixes();
    let navaids = HashMap::new();
    let aerodromes = HashMap::from([("KATL".to_owned(), atlanta())]);
    let resolver = Resolver {
        fixes: &fixes,
        navaids: &navaids,
        aerodromes: &aerodromes,
        radii: &DEFAULT_VARIATION_RADII,
    };

    let procedure = Procedure::try_assemble(&legs, &resolver).unwrap();
    assert_eq!(procedure.kind(), ProcedureKind::Sid);
    assert_eq!(procedure.name(), "ZELAN4");
    assert_eq!(procedure.airport(), "KATL");
    let Procedure::Sid(sid) = &procedure else {
        panic!("expected a SID");
    };
    assert!(sid.common_route.is_empty());
    assert_eq!(sid.runway_transitions.len(), 1);
    assert_eq!(sid.enroute_transitions.len(), 7);

    let route = procedure.select_route(Some("RW27R"), Some("BOBBD")).unwrap();
    assert_eq!(
        endpoint_names(&route),
        ["CPARK", "MPASS", "ZELAN", "ZELAN", "SMKEY", "HUCHH", "BOBBD"]
    );
    assert!(route.iter().all(|instruction| instruction
        .endpoint
        .as_ref()
        .and_then(Endpoint::position)
        .is_some()));

    match &route[0].via {
        Some(Via::Course { course }) => assert!(!course.lacks_variation()),
        via => panic!("unexpected via {via:?}"),
    }
    match &route[1].via {
        Some(Via::Arc { center, arc_to, .. }) => {
            assert_eq!(center.name, "CFZJF");
            assert!(center.position.is_some());
            assert!(!arc_to.lacks_variation());
        }
        via => panic!("unexpected via {via:?}"),
    }

    let runway_only = procedure.select_route(Some("RW27R"), None).unwrap();
    assert_eq!(endpoint_names(&runway_only), ["CPARK", "MPASS", "ZELAN"]);

    assert!(matches!(
        procedure.select_route(Some("RW27R"), Some("NOPE")),
        Err(Error::UnknownTransition { name, .. }) if name == "NOPE"
    ));
    assert!(matches!(
        procedure.select_route(Some("RW27L"), Some("BOBBD")),
        Err(Error::UnknownTransition { name, .. }) if name == "RW27L"
    ));
}

fn sample_distribution() -> String {
    let mut lines = vec!["HDR01FAACIFP18      001P013203958812009", MORA_UNKNOWN, NDB_UAD];
    lines.extend(KSBA);
    lines.extend(ZELAN4);
    lines.join("\n")
}

#[test]
fn test_read_distribution() {
    let cifp = CifpReader::new(sample_distribution().as_bytes()).try_read().unwrap();

    assert_eq!(cifp.cycle, 2014);
    assert_eq!(cifp.moras.len(), 1);
    assert_eq!(cifp.navaid("UAD").map(<[_]>::len), Some(1));
    assert_eq!(cifp.fix("UAD").map(<[_]>::len), Some(1));

    // The circle and the arc loop carry different multi codes.
    assert_eq!(cifp.airspaces.len(), 2);
    let inside = point("N34262100W119513600");
    assert!(cifp.airspaces_containing(inside, Altitude::msl(2100)).count() >= 1);
    assert_eq!(cifp.airspaces_containing(inside, Altitude::msl(20000)).count(), 0);

    // None of the departure fixes are in the sample, so the whole procedure
    // is dropped as a single group.
    assert!(cifp.procedures.is_empty());
    assert_eq!(cifp.non_critical_errors.len(), 1);
    let (line_number, key, error) = &cifp.non_critical_errors[0];
    assert_eq!(*line_number, 9);
    assert_eq!(key, "KATL ZELAN4");
    assert!(matches!(error, Error::UnknownFix(_)));
}

#[test]
fn test_bad_line_is_skipped() {
    let text = format!("{MORA_UNKNOWN}\nSUSAP KATL\n{NDB_UAD}\n");
    let cifp = CifpReader::new(text.as_bytes()).try_read().unwrap();
    assert_eq!(cifp.moras.len(), 1);
    assert_eq!(cifp.navaids.len(), 1);
    assert_eq!(cifp.non_critical_errors.len(), 1);
    assert_eq!(cifp.non_critical_errors[0].0, 2);
}

#[test]
fn test_cache_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let cifp = CifpReader::new(sample_distribution().as_bytes()).try_read().unwrap();
    cache::save(&cifp, dir.path()).unwrap();

    let restored = cache::load(dir.path()).unwrap();
    assert_eq!(restored.cycle, cifp.cycle);
    assert_eq!(restored.moras.len(), 1);
    assert_eq!(restored.navaid("UAD").map(<[_]>::len), Some(1));
    assert_eq!(restored.fixes.len(), cifp.fixes.len());
    assert!(restored.airspaces.is_empty());
    assert!(restored.non_critical_errors.is_empty());
}

#[test]
fn test_loader_falls_back_to_cache() {
    let cache_dir = tempfile::tempdir().unwrap();
    let mut source = tempfile::NamedTempFile::new().unwrap();
    source.write_all(sample_distribution().as_bytes()).unwrap();

    let loader = CifpLoader::new(LoaderConfig {
        cache_dir: Some(cache_dir.path().to_path_buf()),
        ..Default::default()
    });

    let parsed = loader.load_or_cached(Some(source.path())).unwrap();
    assert_eq!(parsed.airspaces.len(), 2);

    let cached = loader.load_or_cached(None).unwrap();
    assert_eq!(cached.cycle, parsed.cycle);
    assert!(cached.airspaces.is_empty());

    let missing = source.path().with_extension("missing");
    assert_eq!(loader.load_or_cached(Some(missing.as_path())).unwrap().cycle, 2014);
}

#[test]
fn test_loader_without_cache() {
    let cache_dir = tempfile::tempdir().unwrap();
    let loader = CifpLoader::new(LoaderConfig {
        cache_dir: Some(cache_dir.path().join("empty")),
        ..Default::default()
    });
    assert!(loader.load_or_cached(None).is_err());
}

#[test]
fn test_restrictive_airspace_switch() {
    let config = LoaderConfig {
        include_restrictive_airspace: false,
        ..Default::default()
    };
    let cifp = CifpReader::with_config(sample_distribution().as_bytes(), &config).try_read().unwrap();
    // Controlled airspace is unaffected.
    assert_eq!(cifp.airspaces.len(), 2);
}
