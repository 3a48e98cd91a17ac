use jobconf_xml::{
    CodecConfig, EmptyContent, EntryLayout, Result, StartTag, StringMap, TokenBuffer, TokenSink,
    TokenSource, XmlMapError, XmlToken, XmlTokenReader, XmlTokenWriter, attribute_map_from_xml_str,
    attribute_map_to_xml_string, decode_attribute_map, decode_element_map,
    element_map_from_xml_str, element_map_to_xml_string, encode_attribute_map, encode_element_map,
};

fn map(pairs: &[(&str, &str)]) -> StringMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn job_options() -> StringMap {
    map(&[
        ("command", "tar -czf /tmp/backup.tgz /srv"),
        ("user", "deploy"),
        ("retries", "3"),
        ("note", "a & b < c > d \"quoted\" 'single'"),
        ("empty", ""),
    ])
}

#[test]
fn test_attribute_round_trip_through_tokens() -> Result<()> {
    let original = job_options();
    let layout = EntryLayout::new("entry", "key", "value");
    let wrapper = StartTag::new("config");

    let mut buffer = TokenBuffer::new();
    encode_attribute_map(&original, &mut buffer, &wrapper, &layout)?;

    // The caller consumes the wrapper start before handing over the stream.
    assert_eq!(buffer.next_token()?, Some(XmlToken::Start(wrapper.clone())));
    let decoded = decode_attribute_map(&mut buffer, &wrapper, &layout)?;

    assert_eq!(decoded, original);
    assert!(buffer.is_empty());
    Ok(())
}

#[test]
fn test_element_round_trip_through_tokens() -> Result<()> {
    let original = job_options();
    let wrapper = StartTag::new("logging");

    let mut buffer = TokenBuffer::new();
    encode_element_map(&original, &mut buffer, &wrapper)?;
    assert_eq!(buffer.next_token()?, Some(XmlToken::Start(wrapper.clone())));
    let decoded = decode_element_map(&mut buffer, &wrapper, EmptyContent::Keep)?;

    assert_eq!(decoded, original);
    Ok(())
}

#[test]
fn test_attribute_round_trip_through_xml() -> Result<()> {
    let original = job_options();
    for config in [CodecConfig::default(), CodecConfig::for_testing()] {
        let xml = attribute_map_to_xml_string(&original, "config", &config)?;
        let (wrapper, decoded) = attribute_map_from_xml_str(&xml, &config)?;
        assert_eq!(wrapper, "config");
        assert_eq!(decoded, original, "round trip failed for:\n{}", xml);
    }
    Ok(())
}

#[test]
fn test_element_round_trip_through_xml() -> Result<()> {
    let original = job_options();
    for config in [CodecConfig::default(), CodecConfig::for_testing()] {
        let xml = element_map_to_xml_string(&original, "logging", &config)?;
        let (wrapper, decoded) = element_map_from_xml_str(&xml, &config)?;
        assert_eq!(wrapper, "logging");
        assert_eq!(decoded, original, "round trip failed for:\n{}", xml);
    }
    Ok(())
}

#[test]
fn test_custom_layout_round_trip() -> Result<()> {
    let config = CodecConfig {
        entry_tag: "option".to_string(),
        key_attr: "name".to_string(),
        value_attr: "setting".to_string(),
        ..Default::default()
    };
    let original = map(&[("a", "1")]);
    let xml = attribute_map_to_xml_string(&original, "plugin", &config)?;
    assert_eq!(xml, r#"<plugin><option name="a" setting="1"/></plugin>"#);
    let (_, decoded) = attribute_map_from_xml_str(&xml, &config)?;
    assert_eq!(decoded, original);
    Ok(())
}

#[test]
fn test_encoding_is_deterministic_and_sorted() -> Result<()> {
    let keys = ["delta", "alpha", "charlie", "bravo", "echo"];
    let forward: StringMap = keys.iter().map(|k| (k.to_string(), k.len().to_string())).collect();
    let mut backward = StringMap::new();
    for k in keys.iter().rev() {
        backward.insert(k.to_string(), k.len().to_string());
    }

    let config = CodecConfig::default();
    let first = attribute_map_to_xml_string(&forward, "config", &config)?;
    let second = attribute_map_to_xml_string(&backward, "config", &config)?;
    assert_eq!(first, second);

    let positions: Vec<usize> = ["alpha", "bravo", "charlie", "delta", "echo"]
        .iter()
        .map(|k| first.find(&format!("key=\"{}\"", k)).expect("key present"))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", first);

    let first = element_map_to_xml_string(&forward, "logging", &config)?;
    let second = element_map_to_xml_string(&backward, "logging", &config)?;
    assert_eq!(first, second);
    assert_eq!(
        first,
        concat!(
            "<logging><alpha>5</alpha><bravo>5</bravo><charlie>7</charlie>",
            "<delta>5</delta><echo>4</echo></logging>",
        )
    );
    Ok(())
}

#[test]
fn test_empty_map_elision() -> Result<()> {
    let mut buffer = TokenBuffer::new();
    encode_attribute_map(
        &StringMap::new(),
        &mut buffer,
        &StartTag::new("config"),
        &EntryLayout::default(),
    )?;
    encode_element_map(&StringMap::new(), &mut buffer, &StartTag::new("logging"))?;
    assert!(buffer.is_empty());

    let (_, decoded) = attribute_map_from_xml_str("<config></config>", &CodecConfig::default())?;
    assert!(decoded.is_empty());
    let (_, decoded) = element_map_from_xml_str("<logging/>", &CodecConfig::default())?;
    assert!(decoded.is_empty());
    Ok(())
}

#[test]
fn test_attribute_decode_documented_example() -> Result<()> {
    let config = CodecConfig {
        key_attr: "k".to_string(),
        value_attr: "v".to_string(),
        ..Default::default()
    };
    let xml = r#"<wrapper><entry k="a" v="1"/><entry k="b" v="2"/></wrapper>"#;
    let (_, decoded) = attribute_map_from_xml_str(xml, &config)?;
    assert_eq!(decoded, map(&[("a", "1"), ("b", "2")]));
    Ok(())
}

#[test]
fn test_attribute_decode_missing_key() {
    let xml = r#"<wrapper><entry value="1"/></wrapper>"#;
    let err = attribute_map_from_xml_str(xml, &CodecConfig::default()).unwrap_err();
    assert!(matches!(err, XmlMapError::MissingRequiredKey { .. }));
    assert_eq!(err.to_string(), "found entry entry with empty key");
}

#[test]
fn test_attribute_decode_missing_value() -> Result<()> {
    let xml = r#"<wrapper><entry key="a"/></wrapper>"#;
    let (_, decoded) = attribute_map_from_xml_str(xml, &CodecConfig::default())?;
    assert_eq!(decoded, map(&[("a", "")]));
    Ok(())
}

#[test]
fn test_attribute_decode_stray_element() {
    let xml = r#"<wrapper><entry key="a" value="1"/><other/></wrapper>"#;
    let err = attribute_map_from_xml_str(xml, &CodecConfig::default()).unwrap_err();
    match &err {
        XmlMapError::StructuralMismatch { found, .. } => assert_eq!(found, "other"),
        other => panic!("expected StructuralMismatch, got {:?}", other),
    }
    assert!(err.to_string().contains("other"));
}

#[test]
fn test_element_decode_documented_example() -> Result<()> {
    let xml = "<wrapper><x>10</x><y>20</y></wrapper>";
    let (_, decoded) = element_map_from_xml_str(xml, &CodecConfig::default())?;
    assert_eq!(decoded, map(&[("x", "10"), ("y", "20")]));
    Ok(())
}

#[test]
fn test_element_decode_empty_content() -> Result<()> {
    let xml = "<wrapper><x></x><y/><z>1</z></wrapper>";

    // Empty content is an empty value by default.
    let (_, decoded) = element_map_from_xml_str(xml, &CodecConfig::default())?;
    assert_eq!(decoded, map(&[("x", ""), ("y", ""), ("z", "1")]));

    // The legacy behaviour silently loses fields that have no text token.
    let legacy = CodecConfig {
        empty_content: EmptyContent::Drop,
        ..Default::default()
    };
    let (_, decoded) = element_map_from_xml_str(xml, &legacy)?;
    assert_eq!(decoded, map(&[("z", "1")]));
    Ok(())
}

#[test]
fn test_keys_named_like_the_wrapper() -> Result<()> {
    let xml = "<logging><logging>1</logging><z>2</z></logging>";
    let (wrapper, decoded) = element_map_from_xml_str(xml, &CodecConfig::default())?;
    assert_eq!(wrapper, "logging");
    assert_eq!(decoded, map(&[("logging", "1"), ("z", "2")]));

    let original = map(&[("logging", "1"), ("z", "2")]);
    for config in [CodecConfig::default(), CodecConfig::for_testing()] {
        let xml = element_map_to_xml_string(&original, "logging", &config)?;
        let (_, decoded) = element_map_from_xml_str(&xml, &config)?;
        assert_eq!(decoded, original, "round trip failed for:\n{}", xml);
    }

    // An entry tag that shares the wrapper's name still ends at the wrapper.
    let config = CodecConfig {
        entry_tag: "config".to_string(),
        ..Default::default()
    };
    let xml = r#"<config><config key="a" value="1"/><config key="b" value="2"/></config>"#;
    let (_, decoded) = attribute_map_from_xml_str(xml, &config)?;
    assert_eq!(decoded, map(&[("a", "1"), ("b", "2")]));
    Ok(())
}

#[test]
fn test_trailing_content_after_wrapper_is_rejected() {
    let config = CodecConfig::default();
    let err = attribute_map_from_xml_str("<config></config><junk/>", &config).unwrap_err();
    assert!(matches!(err, XmlMapError::Parse(_)));

    let err = element_map_from_xml_str("<logging></logging><junk/>", &config).unwrap_err();
    assert!(matches!(err, XmlMapError::Parse(_)));
}

#[test]
fn test_truncated_documents_fail_with_eof() {
    let config = CodecConfig::default();

    let err = attribute_map_from_xml_str(r#"<config><entry key="a" value="1"/>"#, &config)
        .unwrap_err();
    assert!(
        matches!(err, XmlMapError::UnexpectedEndOfStream { ref wrapper } if wrapper == "config")
    );

    let err = element_map_from_xml_str("<logging><x>1</x>", &config).unwrap_err();
    assert!(
        matches!(err, XmlMapError::UnexpectedEndOfStream { ref wrapper } if wrapper == "logging")
    );
}

#[test]
fn test_malformed_xml_is_a_parse_error() {
    let xml = r#"<config><entry key="a" value="1"></config>"#;
    let err = attribute_map_from_xml_str(xml, &CodecConfig::default()).unwrap_err();
    assert!(matches!(err, XmlMapError::Parse(_)));
}

/// Two map fields embedded in a larger job document, the way an outer
/// decoder drives the codecs.
#[test]
fn test_codecs_inside_outer_document() -> Result<()> {
    let job = map(&[("command", "uptime"), ("shell", "bash")]);
    let logging = map(&[("level", "debug"), ("format", "json")]);
    let layout = EntryLayout::default();

    let mut writer = XmlTokenWriter::with_indent(Vec::new(), 2);
    writer.write_token(XmlToken::start("job"))?;
    writer.write_token(XmlToken::start("name"))?;
    writer.write_token(XmlToken::text("nightly"))?;
    writer.write_token(XmlToken::end("name"))?;
    encode_attribute_map(&job, &mut writer, &StartTag::new("config"), &layout)?;
    encode_element_map(&StringMap::new(), &mut writer, &StartTag::new("empty"))?;
    encode_element_map(&logging, &mut writer, &StartTag::new("logging"))?;
    writer.write_token(XmlToken::end("job"))?;
    let xml = String::from_utf8(writer.finish()?).expect("UTF-8 output");
    assert!(!xml.contains("<empty"));

    let mut reader = XmlTokenReader::from_str(&xml);
    let mut decoded_job = None;
    let mut decoded_logging = None;
    while let Some(token) = reader.next_token()? {
        if let XmlToken::Start(tag) = token {
            match tag.name.as_str() {
                "config" => decoded_job = Some(decode_attribute_map(&mut reader, &tag, &layout)?),
                "logging" => {
                    let decoded = decode_element_map(&mut reader, &tag, EmptyContent::Keep)?;
                    decoded_logging = Some(decoded);
                }
                _ => {}
            }
        }
    }

    assert_eq!(decoded_job, Some(job));
    assert_eq!(decoded_logging, Some(logging));
    Ok(())
}
